//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::coach::JobContext;
use crate::config::MAX_QUESTION_COUNT;
use crate::engine::follow_up::{AnswerTurn, FollowUp};
use crate::engine::report::{InterviewEntry, PerformanceReport};
use crate::errors::AppError;
use crate::interview::store;
use crate::models::interview::{InterviewRow, QuestionRow, STATUS_COMPLETED};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateInterviewRequest {
    pub job_title: String,
    pub job_description: String,
    pub question_count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub interview: InterviewRow,
    pub questions: Vec<QuestionRow>,
    /// Backend that wrote the questions; absent when reading back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub question_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub answered: QuestionRow,
    pub feedback: String,
    pub next_question: QuestionRow,
    pub backend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub interview_id: Uuid,
    pub report: PerformanceReport,
    pub backend: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Extracts keywords from the job description, writes the opening question
/// set, and persists both.
pub async fn handle_create_interview(
    State(state): State<AppState>,
    Json(request): Json<CreateInterviewRequest>,
) -> Result<(StatusCode, Json<InterviewResponse>), AppError> {
    require_text("job_title", &request.job_title)?;
    require_text("job_description", &request.job_description)?;
    let count = request
        .question_count
        .unwrap_or(state.config.default_question_count);
    if !(1..=MAX_QUESTION_COUNT).contains(&count) {
        return Err(AppError::Validation(format!(
            "question_count must be between 1 and {MAX_QUESTION_COUNT}"
        )));
    }

    let job = JobContext::new(
        &request.job_title,
        &request.job_description,
        state.coach.engine(),
    );
    let questions = state.coach.questions(&job, count).await;

    let interview = store::create_interview(&state.db, &job).await?;
    let rows = store::insert_questions(&state.db, interview.id, &questions.value).await?;
    info!(
        "Interview {} opened with {} questions ({} backend)",
        interview.id,
        rows.len(),
        questions.backend
    );

    Ok((
        StatusCode::CREATED,
        Json(InterviewResponse {
            interview,
            questions: rows,
            backend: Some(questions.backend),
        }),
    ))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<InterviewResponse>, AppError> {
    let interview = load_interview(&state, interview_id).await?;
    let questions = store::list_questions(&state.db, interview_id).await?;
    Ok(Json(InterviewResponse {
        interview,
        questions,
        backend: None,
    }))
}

/// POST /api/v1/interviews/:id/answers
///
/// Stores the answer with inline feedback and appends the follow-up question.
/// Each question takes one answer, and a completed interview takes none.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    require_text("answer", &request.answer)?;

    let interview = load_interview(&state, interview_id).await?;
    let questions = store::list_questions(&state.db, interview_id).await?;
    let current = questions
        .iter()
        .find(|q| q.id == request.question_id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Question {} not found in interview {interview_id}",
                request.question_id
            ))
        })?;
    ensure_answerable(&interview, current)?;

    let previous: Vec<String> = questions.iter().map(|q| q.question_text.clone()).collect();
    let job = job_context(interview);
    let turn = AnswerTurn {
        current_question: &current.question_text,
        answer: &request.answer,
        previous_questions: &previous,
    };
    let coached = state.coach.follow_up(&job, &turn).await;
    let FollowUp { question, feedback } = coached.value;

    // A concurrent submission for the same question loses here.
    let answered = store::record_answer(&state.db, current.id, &request.answer, &feedback)
        .await?
        .ok_or_else(|| already_answered(current.id))?;
    let next_question = store::insert_questions(&state.db, interview_id, &[question])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Follow-up question was not stored")))?;

    Ok(Json(SubmitAnswerResponse {
        answered,
        feedback,
        next_question,
        backend: coached.backend,
    }))
}

/// POST /api/v1/interviews/:id/report
///
/// Scores every answered question, stores per-question score/feedback and the
/// report, and marks the interview completed. Unanswered questions are skipped.
pub async fn handle_generate_report(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<ReportResponse>, AppError> {
    let interview = load_interview(&state, interview_id).await?;
    let answered: Vec<QuestionRow> = store::list_questions(&state.db, interview_id)
        .await?
        .into_iter()
        .filter(|q| q.answer.is_some())
        .collect();

    let interview_data = interview_entries(&answered);
    let job = job_context(interview);
    let coached = state.coach.report(&job, &interview_data).await;
    let report = coached.value;

    for (row, analysis) in answered.iter().zip(&report.question_analysis) {
        store::record_analysis(&state.db, row.id, analysis.score, &analysis.feedback).await?;
    }

    let report_json = serde_json::to_value(&report)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize report: {e}")))?;
    store::complete_interview(&state.db, interview_id, report.overall_score, &report_json).await?;

    Ok(Json(ReportResponse {
        interview_id,
        report,
        backend: coached.backend,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// One answer per question, and none once the report has been written.
fn ensure_answerable(interview: &InterviewRow, question: &QuestionRow) -> Result<(), AppError> {
    if interview.status == STATUS_COMPLETED {
        return Err(AppError::Validation(format!(
            "Interview {} is completed and no longer accepts answers",
            interview.id
        )));
    }
    if question.answer.is_some() {
        return Err(already_answered(question.id));
    }
    Ok(())
}

fn already_answered(question_id: Uuid) -> AppError {
    AppError::Validation(format!("Question {question_id} has already been answered"))
}

async fn load_interview(state: &AppState, interview_id: Uuid) -> Result<InterviewRow, AppError> {
    store::get_interview(&state.db, interview_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))
}

fn job_context(interview: InterviewRow) -> JobContext {
    JobContext {
        title: interview.job_title,
        description: interview.job_description,
        keywords: interview.keywords,
    }
}

/// Answered rows as the question/answer/feedback triples the coach scores.
fn interview_entries(answered: &[QuestionRow]) -> Vec<InterviewEntry> {
    answered
        .iter()
        .filter_map(|q| {
            q.answer.as_ref().map(|answer| InterviewEntry {
                question: q.question_text.clone(),
                answer: answer.clone(),
                feedback: q.feedback.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::STATUS_IN_PROGRESS;
    use chrono::Utc;

    fn row(position: i32, answer: Option<&str>) -> QuestionRow {
        QuestionRow {
            id: Uuid::new_v4(),
            interview_id: Uuid::new_v4(),
            position,
            question_text: format!("Question {position}"),
            answer: answer.map(str::to_string),
            feedback: Some("inline".to_string()),
            score: None,
            created_at: Utc::now(),
        }
    }

    fn interview(status: &str) -> InterviewRow {
        InterviewRow {
            id: Uuid::new_v4(),
            job_title: "Backend Engineer".to_string(),
            job_description: "Rust and SQL".to_string(),
            keywords: vec!["sql".to_string()],
            status: status.to_string(),
            overall_score: None,
            report: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_question_in_progress_interview_is_answerable() {
        assert!(ensure_answerable(&interview(STATUS_IN_PROGRESS), &row(0, None)).is_ok());
    }

    #[test]
    fn test_answered_question_rejects_second_answer() {
        let result = ensure_answerable(&interview(STATUS_IN_PROGRESS), &row(0, Some("first")));
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("already been answered")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_completed_interview_rejects_answers() {
        let result = ensure_answerable(&interview(STATUS_COMPLETED), &row(3, None));
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("completed")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(matches!(require_text("answer", "  \n"), Err(AppError::Validation(_))));
        assert!(require_text("answer", "fine").is_ok());
    }

    #[test]
    fn test_interview_entries_keep_order_and_skip_unanswered() {
        let rows = vec![row(0, Some("first")), row(1, None), row(2, Some("third"))];
        let entries = interview_entries(&rows);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question, "Question 0");
        assert_eq!(entries[1].answer, "third");
        assert_eq!(entries[1].feedback.as_deref(), Some("inline"));
    }

    #[test]
    fn test_create_request_question_count_is_optional() {
        let request: CreateInterviewRequest = serde_json::from_value(serde_json::json!({
            "job_title": "Backend Engineer",
            "job_description": "Rust and SQL"
        }))
        .unwrap();
        assert!(request.question_count.is_none());
    }
}
