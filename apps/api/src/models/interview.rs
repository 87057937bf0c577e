use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub job_title: String,
    pub job_description: String,
    /// Extracted once at creation.
    pub keywords: Vec<String>,
    pub status: String,
    pub overall_score: Option<i32>,
    pub report: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One question asked during an interview. Answer, feedback and score fill
/// in as the interview progresses; rows are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub position: i32,
    pub question_text: String,
    pub answer: Option<String>,
    pub feedback: Option<String>,
    /// 0 – 100 once analysed.
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
}
