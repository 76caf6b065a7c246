use crate::models::participant::Participant;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterParticipantRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub school: String,
    pub class_level: String,
    pub class_roll: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub gender: Option<String>,
    #[validate(length(min = 6, max = 20))]
    pub phone: String,
    pub entry_fee: Decimal,
    pub registered_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterParticipantResponse {
    pub participant: Participant,
    /// Returned exactly once; only the argon2 hash is stored.
    pub temp_password: String,
    pub degraded_roll: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateParticipantRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub school: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub gender: Option<String>,
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
    pub payment_status: Option<bool>,
    pub entry_fee: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextRollResponse {
    pub class_level: String,
    pub roll_number: String,
    /// True when the roll came from the time-derived fallback path and
    /// carries no class-prefix guarantee.
    pub degraded: bool,
}
