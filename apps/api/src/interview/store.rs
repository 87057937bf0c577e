//! Interview persistence. Question records are append-only: rows gain an
//! answer, feedback and score over time but are never deleted.

use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::coach::JobContext;
use crate::models::interview::{InterviewRow, QuestionRow, STATUS_COMPLETED, STATUS_IN_PROGRESS};

pub async fn create_interview(pool: &PgPool, job: &JobContext) -> Result<InterviewRow, sqlx::Error> {
    let interview = sqlx::query_as::<_, InterviewRow>(
        r#"
        INSERT INTO interviews (id, job_title, job_description, keywords, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&job.title)
    .bind(&job.description)
    .bind(&job.keywords)
    .bind(STATUS_IN_PROGRESS)
    .fetch_one(pool)
    .await?;

    info!("Created interview {} for '{}'", interview.id, interview.job_title);
    Ok(interview)
}

pub async fn get_interview(pool: &PgPool, interview_id: Uuid) -> Result<Option<InterviewRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1")
        .bind(interview_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_questions(pool: &PgPool, interview_id: Uuid) -> Result<Vec<QuestionRow>, sqlx::Error> {
    sqlx::query_as::<_, QuestionRow>(
        "SELECT * FROM interview_questions WHERE interview_id = $1 ORDER BY position",
    )
    .bind(interview_id)
    .fetch_all(pool)
    .await
}

/// Appends questions after the interview's current last position.
pub async fn insert_questions(
    pool: &PgPool,
    interview_id: Uuid,
    questions: &[String],
) -> Result<Vec<QuestionRow>, sqlx::Error> {
    let last: Option<i32> = sqlx::query_scalar(
        "SELECT MAX(position) FROM interview_questions WHERE interview_id = $1",
    )
    .bind(interview_id)
    .fetch_one(pool)
    .await?;
    let first = last.map_or(0, |p| p + 1);

    let mut rows = Vec::with_capacity(questions.len());
    for (offset, text) in questions.iter().enumerate() {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            INSERT INTO interview_questions (id, interview_id, position, question_text)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(interview_id)
        .bind(first + offset as i32)
        .bind(text)
        .fetch_one(pool)
        .await?;
        rows.push(row);
    }
    Ok(rows)
}

/// Stores the candidate's answer with the inline feedback shown for it.
/// `None` when the question already holds an answer.
pub async fn record_answer(
    pool: &PgPool,
    question_id: Uuid,
    answer: &str,
    feedback: &str,
) -> Result<Option<QuestionRow>, sqlx::Error> {
    sqlx::query_as::<_, QuestionRow>(
        r#"
        UPDATE interview_questions
        SET answer = $2, feedback = $3
        WHERE id = $1 AND answer IS NULL
        RETURNING *
        "#,
    )
    .bind(question_id)
    .bind(answer)
    .bind(feedback)
    .fetch_optional(pool)
    .await
}

/// Stores the end-of-interview score and feedback. Score is clamped to 0–100.
pub async fn record_analysis(
    pool: &PgPool,
    question_id: Uuid,
    score: u32,
    feedback: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE interview_questions SET score = $2, feedback = $3 WHERE id = $1")
        .bind(question_id)
        .bind(clamp_score(score))
        .bind(feedback)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn complete_interview(
    pool: &PgPool,
    interview_id: Uuid,
    overall_score: u32,
    report: &Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE interviews
        SET status = $2, overall_score = $3, report = $4, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(interview_id)
    .bind(STATUS_COMPLETED)
    .bind(clamp_score(overall_score))
    .bind(report)
    .execute(pool)
    .await?;

    info!("Completed interview {interview_id} with score {overall_score}");
    Ok(())
}

fn clamp_score(score: u32) -> i32 {
    score.min(100) as i32
}
