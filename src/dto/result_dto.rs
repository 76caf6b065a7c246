use crate::models::submission::AnswerMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitResultRequest {
    pub participant_id: Uuid,
    pub exam_id: Uuid,
    pub class_id: Uuid,
    pub answers: AnswerMap,
    #[validate(length(max = 120))]
    pub submitted_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EditResultRequest {
    pub participant_id: Uuid,
    pub exam_id: Uuid,
    pub class_id: Uuid,
    pub answers: AnswerMap,
}
