use crate::models::exam::Exam;
use crate::models::exam_class::ExamClass;
use crate::models::submission::AnswerMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    pub question_count: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(range(min = 2000, max = 2100))]
    pub year: Option<i32>,
    pub question_count: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertExamClassRequest {
    pub class_level: String,
    #[validate(length(min = 1, max = 50))]
    pub set_name: String,
    /// Ordered question list; stored verbatim.
    pub questions: JsonValue,
    pub answer_key: AnswerMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamWithClassesResponse {
    #[serde(flatten)]
    pub exam: Exam,
    pub classes: Vec<ExamClass>,
}
