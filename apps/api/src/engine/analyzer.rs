//! Answer analysis — keyword/length scoring and the two feedback paths.
//!
//! `analyze` produces the score-tier feedback stored with the report.
//! `keyword_feedback` produces the inline feedback shown right after an
//! answer. The two are independent rules and may read differently.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::keywords::mentioned_keywords;
use crate::engine::tables::{TemplateTables, SKILL_SLOT};
use crate::engine::EngineError;

const BASE_SCORE: i32 = 70;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerAnalysis {
    /// 0 – 100
    pub score: u32,
    pub feedback: String,
}

/// Scores an answer and picks the matching feedback tier.
pub fn analyze(answer: &str, keywords: &[String], tables: &TemplateTables) -> AnswerAnalysis {
    let score = score_answer(answer, keywords);
    AnswerAnalysis {
        score,
        feedback: tier_feedback(score, tables).to_string(),
    }
}

/// Base 70, adjusted once for keyword mentions and once for length, clamped to 0–100.
pub fn score_answer(answer: &str, keywords: &[String]) -> u32 {
    let mentions = mentioned_keywords(answer, keywords).len();
    let word_count = answer.split_whitespace().count();

    let keyword_bonus = match mentions {
        m if m > 3 => 15,
        2..=3 => 10,
        1 => 5,
        _ => 0,
    };

    let length_adjustment = match word_count {
        w if w > 150 => 10,
        101..=150 => 5,
        w if w < 20 => -15,
        20..=49 => -5,
        _ => 0,
    };

    (BASE_SCORE + keyword_bonus + length_adjustment).clamp(0, 100) as u32
}

pub fn tier_feedback(score: u32, tables: &TemplateTables) -> &str {
    let tiers = &tables.feedback_tiers;
    match score {
        s if s >= 90 => tiers.excellent.as_str(),
        s if s >= 80 => tiers.very_good.as_str(),
        s if s >= 70 => tiers.good.as_str(),
        s if s >= 60 => tiers.fair.as_str(),
        _ => tiers.needs_improvement.as_str(),
    }
}

/// Inline feedback: praise a random mentioned keyword, or acknowledge generically.
pub fn keyword_feedback<R: Rng + ?Sized>(
    answer: &str,
    keywords: &[String],
    tables: &TemplateTables,
    rng: &mut R,
) -> Result<String, EngineError> {
    let mentioned = mentioned_keywords(answer, keywords);

    match mentioned.choose(rng) {
        Some(keyword) => {
            let template = tables
                .positive_feedback
                .choose(rng)
                .ok_or(EngineError::EmptyPool("positive_feedback"))?;
            Ok(template.replace(SKILL_SLOT, keyword))
        }
        None => tables
            .generic_acknowledgments
            .choose(rng)
            .cloned()
            .ok_or(EngineError::EmptyPool("generic_acknowledgments")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn keywords(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_empty_answer_scores_55_with_lowest_tier() {
        let tables = TemplateTables::default();
        let analysis = analyze("", &keywords(&["rust", "sql"]), &tables);
        assert_eq!(analysis.score, 55);
        assert_eq!(analysis.feedback, tables.feedback_tiers.needs_improvement);
        assert!(analysis.feedback.starts_with("Answer needs improvement"));
    }

    #[test]
    fn test_four_keywords_and_160_words_scores_95() {
        let tables = TemplateTables::default();
        let kws = keywords(&["rust", "docker", "sql", "aws"]);
        let answer = format!("rust docker sql aws {}", words(156));
        assert_eq!(answer.split_whitespace().count(), 160);

        let analysis = analyze(&answer, &kws, &tables);
        assert_eq!(analysis.score, 95);
        assert_eq!(analysis.feedback, tables.feedback_tiers.excellent);
    }

    #[test]
    fn test_keyword_bands_are_exclusive() {
        let kws = keywords(&["a1", "b2", "c3", "d4"]);
        let body = words(60); // neutral length band
        assert_eq!(score_answer(&body, &kws), 70);
        assert_eq!(score_answer(&format!("a1 {body}"), &kws), 75);
        assert_eq!(score_answer(&format!("a1 b2 {body}"), &kws), 80);
        assert_eq!(score_answer(&format!("a1 b2 c3 {body}"), &kws), 80);
        assert_eq!(score_answer(&format!("a1 b2 c3 d4 {body}"), &kws), 85);
    }

    #[test]
    fn test_length_bands() {
        let kws = keywords(&["zzz"]);
        assert_eq!(score_answer(&words(19), &kws), 55);
        assert_eq!(score_answer(&words(20), &kws), 65);
        assert_eq!(score_answer(&words(49), &kws), 65);
        assert_eq!(score_answer(&words(50), &kws), 70);
        assert_eq!(score_answer(&words(100), &kws), 70);
        assert_eq!(score_answer(&words(101), &kws), 75);
        assert_eq!(score_answer(&words(150), &kws), 75);
        assert_eq!(score_answer(&words(151), &kws), 80);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_substring() {
        let kws = keywords(&["java"]);
        assert_eq!(score_answer(&format!("JavaScript {}", words(59)), &kws), 75);
    }

    #[test]
    fn test_tier_thresholds() {
        let t = TemplateTables::default();
        assert_eq!(tier_feedback(90, &t), t.feedback_tiers.excellent);
        assert_eq!(tier_feedback(89, &t), t.feedback_tiers.very_good);
        assert_eq!(tier_feedback(80, &t), t.feedback_tiers.very_good);
        assert_eq!(tier_feedback(70, &t), t.feedback_tiers.good);
        assert_eq!(tier_feedback(60, &t), t.feedback_tiers.fair);
        assert_eq!(tier_feedback(59, &t), t.feedback_tiers.needs_improvement);
    }

    #[test]
    fn test_keyword_feedback_names_a_mentioned_keyword() {
        let tables = TemplateTables::default();
        let kws = keywords(&["rust", "kafka", "sql"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let feedback =
                keyword_feedback("I built it in Rust on Kafka", &kws, &tables, &mut rng).unwrap();
            assert!(
                feedback.contains("rust") || feedback.contains("kafka"),
                "unexpected feedback: {feedback}"
            );
            assert!(!feedback.contains(SKILL_SLOT));
        }
    }

    #[test]
    fn test_keyword_feedback_without_mentions_is_generic() {
        let tables = TemplateTables::default();
        let mut rng = StdRng::seed_from_u64(7);
        let feedback =
            keyword_feedback("I like teamwork", &keywords(&["rust"]), &tables, &mut rng).unwrap();
        assert!(tables.generic_acknowledgments.contains(&feedback));
    }

    #[test]
    fn test_keyword_feedback_reports_empty_pool() {
        let tables = TemplateTables {
            positive_feedback: vec![],
            ..TemplateTables::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let err = keyword_feedback("rust", &keywords(&["rust"]), &tables, &mut rng).unwrap_err();
        assert!(matches!(err, EngineError::EmptyPool("positive_feedback")));
    }

    #[test]
    fn test_seeded_feedback_is_reproducible() {
        let tables = TemplateTables::default();
        let kws = keywords(&["rust", "sql", "aws"]);
        let answer = "rust sql aws";
        let a = keyword_feedback(answer, &kws, &tables, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = keyword_feedback(answer, &kws, &tables, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}
