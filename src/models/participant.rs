use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub school: String,
    pub class_level: String,
    pub class_roll: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub phone: String,
    pub roll_number: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub payment_status: bool,
    pub entry_fee: Decimal,
    pub registered_by: Option<String>,
    pub created_at: DateTime<Utc>,
}
