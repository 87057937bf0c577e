//! Coach — pluggable backend that writes questions, follow-ups and reports.
//!
//! `LlmCoach` asks the hosted model; `HeuristicCoach` runs the rule-based
//! engine. `FallbackCoach` tries the LLM first and falls through to the
//! engine on any failure, so callers always get an answer.
//!
//! `AppState` holds an `Arc<FallbackCoach>`.

pub mod heuristic;
pub mod llm;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::engine::follow_up::{AnswerTurn, FollowUp};
use crate::engine::report::{InterviewEntry, PerformanceReport};
use crate::engine::Engine;
use crate::errors::AppError;

pub use heuristic::HeuristicCoach;
pub use llm::LlmCoach;

/// The role being interviewed for. Keywords are extracted once, when the
/// interview is created, and travel with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobContext {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

impl JobContext {
    pub fn new(title: &str, description: &str, engine: &Engine) -> Self {
        Self {
            title: title.trim().to_string(),
            description: description.to_string(),
            keywords: engine.extract_keywords(description),
        }
    }
}

#[async_trait]
pub trait Coach: Send + Sync {
    async fn questions(&self, job: &JobContext, count: usize) -> Result<Vec<String>, AppError>;

    async fn follow_up(
        &self,
        job: &JobContext,
        turn: &AnswerTurn<'_>,
    ) -> Result<FollowUp, AppError>;

    async fn report(
        &self,
        job: &JobContext,
        interview_data: &[InterviewEntry],
    ) -> Result<PerformanceReport, AppError>;

    /// "llm" | "heuristic" — surfaced to clients for transparency.
    fn backend(&self) -> &'static str;
}

/// A coach result tagged with the backend that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coached<T> {
    pub value: T,
    pub backend: &'static str,
}

/// Primary coach (usually the LLM) with the heuristic engine behind it.
pub struct FallbackCoach {
    primary: Option<Arc<dyn Coach>>,
    fallback: HeuristicCoach,
}

impl FallbackCoach {
    pub fn new(primary: Option<Arc<dyn Coach>>, fallback: HeuristicCoach) -> Self {
        Self { primary, fallback }
    }

    pub fn engine(&self) -> &Engine {
        self.fallback.engine()
    }

    pub async fn questions(&self, job: &JobContext, count: usize) -> Coached<Vec<String>> {
        if let Some(primary) = &self.primary {
            match primary.questions(job, count).await {
                Ok(value) => return tagged(value, primary.as_ref()),
                Err(e) => warn!("{} coach failed to write questions: {e}", primary.backend()),
            }
        }
        tagged(self.fallback.generate_questions(job, count), &self.fallback)
    }

    pub async fn follow_up(&self, job: &JobContext, turn: &AnswerTurn<'_>) -> Coached<FollowUp> {
        if let Some(primary) = &self.primary {
            match primary.follow_up(job, turn).await {
                Ok(value) => return tagged(value, primary.as_ref()),
                Err(e) => warn!("{} coach failed to write a follow-up: {e}", primary.backend()),
            }
        }
        tagged(self.fallback.next_question(job, turn), &self.fallback)
    }

    pub async fn report(
        &self,
        job: &JobContext,
        interview_data: &[InterviewEntry],
    ) -> Coached<PerformanceReport> {
        if let Some(primary) = &self.primary {
            match primary.report(job, interview_data).await {
                Ok(value) => return tagged(value, primary.as_ref()),
                Err(e) => warn!("{} coach failed to write a report: {e}", primary.backend()),
            }
        }
        tagged(self.fallback.generate_report(job, interview_data), &self.fallback)
    }
}

fn tagged<T>(value: T, coach: &dyn Coach) -> Coached<T> {
    Coached {
        value,
        backend: coach.backend(),
    }
}
