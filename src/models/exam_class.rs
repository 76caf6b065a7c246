use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// A per-class variant ("set") of an exam, carrying the question list and
/// the authoritative answer key for that class.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExamClass {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub class_level: String,
    pub set_name: String,
    pub questions: JsonValue,
    pub answer_key: JsonValue,
    pub created_at: DateTime<Utc>,
}
