//! Question synthesis — technical, behavioral and role-specific pools,
//! shuffled and truncated to the requested count.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::engine::tables::{TemplateTables, SKILL_SLOT, TITLE_SLOT};
use crate::engine::EngineError;

/// Builds `count` interview questions for `job_title` from `keywords`.
///
/// Output order is a uniform random permutation of the combined pools, so two
/// calls with identical input differ unless `rng` is seeded identically.
/// Never fails: an unusable pool falls back to the fixed role-aware list.
pub fn generate_questions<R: Rng + ?Sized>(
    job_title: &str,
    keywords: &[String],
    count: usize,
    tables: &TemplateTables,
    rng: &mut R,
) -> Vec<String> {
    match try_generate_questions(job_title, keywords, count, tables, rng) {
        Ok(questions) => questions,
        Err(e) => {
            warn!("Question synthesis failed ({e}); using fallback questions");
            fallback_questions(job_title, count, tables)
        }
    }
}

fn try_generate_questions<R: Rng + ?Sized>(
    job_title: &str,
    keywords: &[String],
    count: usize,
    tables: &TemplateTables,
    rng: &mut R,
) -> Result<Vec<String>, EngineError> {
    let mut pool = question_pool(job_title, keywords, tables);
    if pool.is_empty() {
        return Err(EngineError::EmptyPool("questions"));
    }

    pool.shuffle(rng);
    pool.truncate(count);
    Ok(pool)
}

/// Every question the synthesizer can emit for this title and keyword set.
/// No de-duplication across pools.
pub fn question_pool(job_title: &str, keywords: &[String], tables: &TemplateTables) -> Vec<String> {
    let technical = keywords.iter().flat_map(|skill| {
        tables
            .technical_templates
            .iter()
            .map(move |t| t.replace(SKILL_SLOT, skill))
    });
    let behavioral = tables.behavioral_questions.iter().cloned();
    let role = tables
        .role_templates
        .iter()
        .map(|t| t.replace(TITLE_SLOT, job_title));

    technical.chain(behavioral).chain(role).collect()
}

/// The fixed generic list, title interpolated, capped at `count`.
pub fn fallback_questions(job_title: &str, count: usize, tables: &TemplateTables) -> Vec<String> {
    tables
        .fallback_questions
        .iter()
        .take(count)
        .map(|q| q.replace(TITLE_SLOT, job_title))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn keywords() -> Vec<String> {
        vec!["rust".to_string(), "kubernetes".to_string(), "sql".to_string()]
    }

    #[test]
    fn test_pool_size_is_keywords_times_templates_plus_fixed() {
        let tables = TemplateTables::default();
        let pool = question_pool("Backend Engineer", &keywords(), &tables);
        assert_eq!(pool.len(), 3 * 5 + 10 + 5);
    }

    #[test]
    fn test_returns_exact_count_drawn_from_pool() {
        let tables = TemplateTables::default();
        let pool: HashSet<String> = question_pool("Backend Engineer", &keywords(), &tables)
            .into_iter()
            .collect();

        let mut rng = StdRng::seed_from_u64(3);
        let questions = generate_questions("Backend Engineer", &keywords(), 5, &tables, &mut rng);

        assert_eq!(questions.len(), 5);
        for q in &questions {
            assert!(pool.contains(q), "question outside pool: {q}");
        }
    }

    #[test]
    fn test_title_is_interpolated_in_role_questions() {
        let tables = TemplateTables::default();
        let pool = question_pool("Backend Engineer", &keywords(), &tables);
        assert!(pool.contains(&"What interests you most about the Backend Engineer role?".to_string()));
        assert!(pool.iter().all(|q| !q.contains(TITLE_SLOT) && !q.contains(SKILL_SLOT)));
    }

    #[test]
    fn test_count_larger_than_pool_returns_whole_pool() {
        let tables = TemplateTables::default();
        let mut rng = StdRng::seed_from_u64(3);
        let questions = generate_questions("Backend Engineer", &keywords(), 500, &tables, &mut rng);
        assert_eq!(questions.len(), 30);
    }

    #[test]
    fn test_same_seed_same_questions() {
        let tables = TemplateTables::default();
        let a = generate_questions("SRE", &keywords(), 6, &tables, &mut StdRng::seed_from_u64(11));
        let b = generate_questions("SRE", &keywords(), 6, &tables, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_vary_questions() {
        let tables = TemplateTables::default();
        let runs: HashSet<Vec<String>> = (0..10)
            .map(|seed| {
                generate_questions("SRE", &keywords(), 6, &tables, &mut StdRng::seed_from_u64(seed))
            })
            .collect();
        assert!(runs.len() > 1);
    }

    #[test]
    fn test_empty_pools_fall_back_to_generic_questions() {
        let tables = TemplateTables {
            technical_templates: vec![],
            behavioral_questions: vec![],
            role_templates: vec![],
            ..TemplateTables::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let questions = generate_questions("Data Analyst", &keywords(), 10, &tables, &mut rng);
        assert_eq!(questions, fallback_questions("Data Analyst", 10, &tables));
        assert_eq!(
            questions[0],
            "Tell me about yourself and why you are interested in this Data Analyst position."
        );
    }
}
