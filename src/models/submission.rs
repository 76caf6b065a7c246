use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Stringified 1-based question number -> single-character option label.
/// Stored answer keys and submissions both use this shape; the textual keys
/// are a compatibility contract with historical data.
pub type AnswerMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubmittedAnswers {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub exam_id: Uuid,
    pub class_id: Uuid,
    pub answers: JsonValue,
    pub submitted_by: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
