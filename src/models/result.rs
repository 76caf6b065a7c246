use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per (participant, exam); re-evaluation overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExamResult {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub exam_id: Uuid,
    pub class_id: Uuid,
    pub total_questions: i32,
    pub correct: i32,
    pub wrong: i32,
    pub score: Decimal,
    pub percentage: Decimal,
    pub evaluated_at: DateTime<Utc>,
}
