// Heuristic interview engine.
// Keyword extraction → question synthesis (interview start) or answer analysis +
// follow-up (per answer) → report aggregation (interview end).
// Stands in for the LLM coach whenever that path is unavailable or fails.

pub mod analyzer;
pub mod follow_up;
pub mod keywords;
pub mod questions;
pub mod report;
pub mod tables;

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use crate::engine::follow_up::{AnswerTurn, FollowUp};
use crate::engine::report::{InterviewEntry, PerformanceReport};
use crate::engine::tables::TemplateTables;

/// Internal engine faults. Never returned to callers: every public operation
/// logs them and substitutes its fixed fallback.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("template table '{0}' is empty")]
    EmptyPool(&'static str),

    #[error("no answered questions to aggregate")]
    NoAnswers,

    #[error("report list below minimum length")]
    ShortList,
}

/// The heuristic engine bound to one set of template tables.
#[derive(Debug, Clone)]
pub struct Engine {
    tables: Arc<TemplateTables>,
}

impl Engine {
    pub fn new(tables: Arc<TemplateTables>) -> Self {
        Self { tables }
    }

    pub fn extract_keywords(&self, description: &str) -> Vec<String> {
        keywords::extract_keywords(description, &self.tables)
    }

    pub fn generate_questions<R: Rng + ?Sized>(
        &self,
        job_title: &str,
        keywords: &[String],
        count: usize,
        rng: &mut R,
    ) -> Vec<String> {
        questions::generate_questions(job_title, keywords, count, &self.tables, rng)
    }

    pub fn next_question<R: Rng + ?Sized>(
        &self,
        job_description: &str,
        turn: &AnswerTurn<'_>,
        rng: &mut R,
    ) -> FollowUp {
        follow_up::next_question(job_description, turn, &self.tables, rng)
    }

    pub fn generate_report<R: Rng + ?Sized>(
        &self,
        job_title: &str,
        job_description: &str,
        interview_data: &[InterviewEntry],
        rng: &mut R,
    ) -> PerformanceReport {
        report::generate_report(job_title, job_description, interview_data, &self.tables, rng)
    }
}
