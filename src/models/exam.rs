use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exam {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub question_count: i32,
    pub created_at: DateTime<Utc>,
}
