//! LLM coach — asks the hosted model for questions, follow-ups and reports.
//!
//! Every reply is shape-checked before it is trusted; anything off becomes an
//! `AppError::Llm` and the fallback chain hands the request to the engine.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::coach::prompts::{
    FOLLOW_UP_PROMPT_TEMPLATE, FOLLOW_UP_TASK, QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_TASK,
    REPORT_PROMPT_TEMPLATE, REPORT_TASK,
};
use crate::coach::{Coach, JobContext};
use crate::engine::follow_up::{AnswerTurn, FollowUp};
use crate::engine::report::{InterviewEntry, PerformanceReport};
use crate::engine::tables::TemplateTables;
use crate::errors::AppError;
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::LlmClient;

#[derive(Debug, Deserialize)]
struct QuestionsReply {
    questions: Vec<String>,
}

pub struct LlmCoach {
    llm: LlmClient,
    tables: Arc<TemplateTables>,
}

impl LlmCoach {
    pub fn new(llm: LlmClient, tables: Arc<TemplateTables>) -> Self {
        Self { llm, tables }
    }

    async fn ask<T: serde::de::DeserializeOwned>(
        &self,
        prompt: &str,
        task: &str,
        what: &str,
    ) -> Result<T, AppError> {
        self.llm
            .call_json(prompt, &system_prompt(task))
            .await
            .map_err(|e| AppError::Llm(format!("{what} failed: {e}")))
    }
}

#[async_trait]
impl Coach for LlmCoach {
    async fn questions(&self, job: &JobContext, count: usize) -> Result<Vec<String>, AppError> {
        let prompt = build_questions_prompt(job, count)?;
        let reply: QuestionsReply = self.ask(&prompt, QUESTIONS_TASK, "Question generation").await?;
        checked_questions(reply.questions, count)
    }

    async fn follow_up(
        &self,
        job: &JobContext,
        turn: &AnswerTurn<'_>,
    ) -> Result<FollowUp, AppError> {
        let prompt = build_follow_up_prompt(job, turn)?;
        let reply: FollowUp = self.ask(&prompt, FOLLOW_UP_TASK, "Follow-up generation").await?;
        checked_follow_up(reply)
    }

    async fn report(
        &self,
        job: &JobContext,
        interview_data: &[InterviewEntry],
    ) -> Result<PerformanceReport, AppError> {
        if interview_data.is_empty() {
            return Err(AppError::Llm("No answers to evaluate".to_string()));
        }
        let prompt = build_report_prompt(job, interview_data)?;
        let reply: PerformanceReport = self.ask(&prompt, REPORT_TASK, "Report generation").await?;
        checked_report(reply, interview_data.len(), &self.tables)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, what: &str) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {what}: {e}")))
}

fn build_questions_prompt(job: &JobContext, count: usize) -> Result<String, AppError> {
    Ok(QUESTIONS_PROMPT_TEMPLATE
        .replace("{keywords_json}", &to_json(&job.keywords, "keywords")?)
        .replace("{count}", &count.to_string())
        .replace("{job_title}", &job.title)
        .replace("{job_description}", &job.description))
}

fn build_follow_up_prompt(job: &JobContext, turn: &AnswerTurn<'_>) -> Result<String, AppError> {
    Ok(FOLLOW_UP_PROMPT_TEMPLATE
        .replace("{previous_json}", &to_json(turn.previous_questions, "previous questions")?)
        .replace("{current_question}", turn.current_question)
        .replace("{answer}", turn.answer)
        .replace("{job_title}", &job.title)
        .replace("{job_description}", &job.description))
}

fn build_report_prompt(
    job: &JobContext,
    interview_data: &[InterviewEntry],
) -> Result<String, AppError> {
    let transcript: Vec<_> = interview_data
        .iter()
        .map(|e| serde_json::json!({ "question": e.question, "answer": e.answer }))
        .collect();
    Ok(REPORT_PROMPT_TEMPLATE
        .replace("{interview_json}", &to_json(&transcript, "transcript")?)
        .replace("{job_title}", &job.title)
        .replace("{job_description}", &job.description))
}

fn checked_questions(questions: Vec<String>, count: usize) -> Result<Vec<String>, AppError> {
    let mut questions: Vec<String> = questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();
    if questions.is_empty() {
        return Err(AppError::Llm("Model returned no questions".to_string()));
    }
    questions.truncate(count);
    Ok(questions)
}

fn checked_follow_up(reply: FollowUp) -> Result<FollowUp, AppError> {
    if reply.question.trim().is_empty() {
        return Err(AppError::Llm("Model returned an empty follow-up question".to_string()));
    }
    Ok(FollowUp {
        question: reply.question.trim().to_string(),
        feedback: reply.feedback.trim().to_string(),
    })
}

fn checked_report(
    report: PerformanceReport,
    expected_answers: usize,
    tables: &TemplateTables,
) -> Result<PerformanceReport, AppError> {
    if report.question_analysis.len() != expected_answers {
        return Err(AppError::Llm(format!(
            "Model analysed {} answers, expected {expected_answers}",
            report.question_analysis.len()
        )));
    }
    Ok(report.normalized(tables))
}
