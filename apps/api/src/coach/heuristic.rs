//! Heuristic coach — the rule-based engine behind a seedable random source.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::coach::{Coach, JobContext};
use crate::engine::follow_up::{AnswerTurn, FollowUp};
use crate::engine::report::{InterviewEntry, PerformanceReport};
use crate::engine::Engine;
use crate::errors::AppError;

/// Never fails. With a seed, a fresh process replays the same sequence of
/// questions and sub-scores from one shared generator; without one every
/// call draws from the calling thread's generator and nothing is shared.
pub struct HeuristicCoach {
    engine: Engine,
    seeded: Option<Mutex<StdRng>>,
}

impl HeuristicCoach {
    pub fn new(engine: Engine, seed: Option<u64>) -> Self {
        Self {
            engine,
            seeded: seed.map(|seed| Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    fn with_rng<T>(&self, f: impl FnOnce(&Engine, &mut dyn RngCore) -> T) -> T {
        match &self.seeded {
            Some(rng) => {
                // A panic mid-draw leaves the generator usable.
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                f(&self.engine, &mut *rng)
            }
            None => f(&self.engine, &mut rand::thread_rng()),
        }
    }

    pub fn generate_questions(&self, job: &JobContext, count: usize) -> Vec<String> {
        self.with_rng(|engine, rng| engine.generate_questions(&job.title, &job.keywords, count, rng))
    }

    pub fn next_question(&self, job: &JobContext, turn: &AnswerTurn<'_>) -> FollowUp {
        self.with_rng(|engine, rng| engine.next_question(&job.description, turn, rng))
    }

    pub fn generate_report(
        &self,
        job: &JobContext,
        interview_data: &[InterviewEntry],
    ) -> PerformanceReport {
        self.with_rng(|engine, rng| {
            engine.generate_report(&job.title, &job.description, interview_data, rng)
        })
    }
}

#[async_trait]
impl Coach for HeuristicCoach {
    async fn questions(&self, job: &JobContext, count: usize) -> Result<Vec<String>, AppError> {
        Ok(self.generate_questions(job, count))
    }

    async fn follow_up(
        &self,
        job: &JobContext,
        turn: &AnswerTurn<'_>,
    ) -> Result<FollowUp, AppError> {
        Ok(self.next_question(job, turn))
    }

    async fn report(
        &self,
        job: &JobContext,
        interview_data: &[InterviewEntry],
    ) -> Result<PerformanceReport, AppError> {
        Ok(self.generate_report(job, interview_data))
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}
