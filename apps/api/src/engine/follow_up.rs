//! Follow-up generation — picks a keyword not yet covered by earlier
//! questions and wraps it in a follow-up template.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::analyzer::keyword_feedback;
use crate::engine::keywords::extract_keywords;
use crate::engine::tables::{TemplateTables, SKILL_SLOT};
use crate::engine::EngineError;

/// The answer just given, plus everything asked so far in this interview.
#[derive(Debug, Clone, Copy)]
pub struct AnswerTurn<'a> {
    pub current_question: &'a str,
    pub answer: &'a str,
    pub previous_questions: &'a [String],
}

/// Inline feedback on the last answer and the next question to ask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub question: String,
    pub feedback: String,
}

pub fn next_question<R: Rng + ?Sized>(
    job_description: &str,
    turn: &AnswerTurn<'_>,
    tables: &TemplateTables,
    rng: &mut R,
) -> FollowUp {
    match try_next_question(job_description, turn, tables, rng) {
        Ok(follow_up) => follow_up,
        Err(e) => {
            warn!("Follow-up generation failed ({e}); using fallback question");
            fallback_follow_up(tables)
        }
    }
}

fn try_next_question<R: Rng + ?Sized>(
    job_description: &str,
    turn: &AnswerTurn<'_>,
    tables: &TemplateTables,
    rng: &mut R,
) -> Result<FollowUp, EngineError> {
    // Extraction is pure, so recomputing here matches the interview's stored keywords.
    let keywords = extract_keywords(job_description, tables);
    let unused = unused_keywords(&keywords, turn.previous_questions);

    let question = match unused.choose(rng) {
        Some(skill) => tables
            .follow_up_templates
            .choose(rng)
            .ok_or(EngineError::EmptyPool("follow_up_templates"))?
            .replace(SKILL_SLOT, skill),
        None => tables
            .generic_follow_ups
            .choose(rng)
            .cloned()
            .ok_or(EngineError::EmptyPool("generic_follow_ups"))?,
    };

    let feedback = keyword_feedback(turn.answer, &keywords, tables, rng)?;

    Ok(FollowUp { question, feedback })
}

/// Keywords that do not already appear in any previously asked question.
pub fn unused_keywords<'a>(keywords: &'a [String], previous_questions: &[String]) -> Vec<&'a String> {
    let asked: Vec<String> = previous_questions.iter().map(|q| q.to_lowercase()).collect();
    keywords
        .iter()
        .filter(|k| !asked.iter().any(|q| q.contains(k.as_str())))
        .collect()
}

pub fn fallback_follow_up(tables: &TemplateTables) -> FollowUp {
    FollowUp {
        question: tables.fallback_follow_up.clone(),
        feedback: tables.fallback_feedback.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const JD: &str = "Platform engineer: Rust, Docker, Kubernetes and Terraform on AWS.";

    fn previous(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unused_keywords_skip_asked_ones() {
        let keywords = previous(&["rust", "docker", "aws"]);
        let asked = previous(&["Tell me about your experience with Rust.", "How do you use AWS?"]);
        let unused = unused_keywords(&keywords, &asked);
        assert_eq!(unused, vec![&keywords[1]]);
    }

    #[test]
    fn test_follow_up_targets_an_unused_keyword() {
        let tables = TemplateTables::default();
        let asked = previous(&[
            "Tell me about your experience with rust.",
            "How have you used docker in a recent project?",
            "What best practices do you follow when working with kubernetes?",
            "How would you explain aws to someone without a technical background?",
        ]);
        let turn = AnswerTurn {
            current_question: &asked[3],
            answer: "I explain it as renting computers by the minute.",
            previous_questions: &asked,
        };

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            let follow_up = next_question(JD, &turn, &tables, &mut rng);
            assert!(
                follow_up.question.contains("terraform"),
                "expected terraform follow-up, got: {}",
                follow_up.question
            );
        }
    }

    #[test]
    fn test_all_keywords_used_gives_generic_follow_up() {
        let tables = TemplateTables::default();
        let asked = previous(&["rust docker kubernetes terraform aws"]);
        let turn = AnswerTurn {
            current_question: &asked[0],
            answer: "All of them, daily.",
            previous_questions: &asked,
        };

        let mut rng = StdRng::seed_from_u64(9);
        let follow_up = next_question(JD, &turn, &tables, &mut rng);
        assert!(tables.generic_follow_ups.contains(&follow_up.question));
    }

    #[test]
    fn test_feedback_uses_the_answer_not_the_new_question() {
        let tables = TemplateTables::default();
        let asked = previous(&["Tell me about yourself."]);
        let turn = AnswerTurn {
            current_question: &asked[0],
            answer: "Mostly Docker work lately.",
            previous_questions: &asked,
        };

        let mut rng = StdRng::seed_from_u64(1);
        let follow_up = next_question(JD, &turn, &tables, &mut rng);
        assert!(follow_up.feedback.contains("docker"), "got: {}", follow_up.feedback);
    }

    #[test]
    fn test_empty_templates_yield_fallback_pair() {
        let tables = TemplateTables {
            follow_up_templates: vec![],
            ..TemplateTables::default()
        };
        let asked = previous(&["Tell me about yourself."]);
        let turn = AnswerTurn {
            current_question: &asked[0],
            answer: "Hello",
            previous_questions: &asked,
        };

        let follow_up = next_question(JD, &turn, &tables, &mut StdRng::seed_from_u64(2));
        assert_eq!(follow_up, fallback_follow_up(&tables));
    }
}
