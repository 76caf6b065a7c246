#![allow(dead_code)]

use exam_portal_backend::dto::participant_dto::RegisterParticipantRequest;
use exam_portal_backend::models::submission::AnswerMap;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Connects to `DATABASE_URL` and applies migrations, or returns `None` so
/// callers can skip when no database is available.
pub async fn try_pool() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to DATABASE_URL");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

pub fn register_payload(name: &str, class_level: &str) -> RegisterParticipantRequest {
    RegisterParticipantRequest {
        name: name.to_string(),
        father_name: None,
        mother_name: None,
        school: "Test High School".to_string(),
        class_level: class_level.to_string(),
        class_roll: None,
        email: None,
        gender: None,
        phone: "01700000000".to_string(),
        entry_fee: Decimal::new(100, 0),
        registered_by: Some("tests".to_string()),
    }
}

pub fn answers(entries: &[(&str, &str)]) -> AnswerMap {
    entries
        .iter()
        .map(|(q, a)| (q.to_string(), a.to_string()))
        .collect()
}

/// Clears participants of one class prefix so allocation starts from the
/// first roll again.
pub async fn reset_class(pool: &PgPool, prefix: &str) {
    sqlx::query("DELETE FROM participants WHERE roll_number LIKE $1")
        .bind(format!("{}%", prefix))
        .execute(pool)
        .await
        .expect("Failed to reset class");
}

pub async fn count(pool: &PgPool, sql: &str, id: uuid::Uuid) -> i64 {
    sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("count query failed")
}
