use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unknown class designator: {0}")]
    InvalidClass(String),

    #[error("Invalid answer key: {0}")]
    InvalidAnswerKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate roll number: {0}")]
    DuplicateRoll(String),

    #[error("Roll capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Transient storage error: {0}")]
    Transient(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Machine-readable classification for the calling layer.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::BadRequest(_) => "bad_request",
            Error::InvalidClass(_) => "invalid_class",
            Error::InvalidAnswerKey(_) => "invalid_answer_key",
            Error::NotFound(_) => "not_found",
            Error::DuplicateRoll(_) => "duplicate_roll",
            Error::CapacityExceeded(_) => "capacity_exceeded",
            Error::Transient(_) => "transient_storage",
            Error::Database(_) => "database",
            Error::Validation(_) => "validation",
            Error::Json(_) => "json",
            Error::Anyhow(_) => "internal",
            Error::Internal(_) => "internal",
        }
    }

    /// Safe to retry without operator intervention.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transient(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let code = self.code();
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::InvalidClass(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::InvalidAnswerKey(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::DuplicateRoll(msg) => (StatusCode::CONFLICT, msg),
            Error::CapacityExceeded(msg) => (StatusCode::CONFLICT, msg),
            Error::Transient(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Anyhow(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": code, "message": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            sqlx::Error::PoolTimedOut => Error::Transient("Connection pool timed out".to_string()),
            sqlx::Error::Io(e) => Error::Transient(e.to_string()),
            other => Error::Database(other),
        }
    }
}

/// A uniqueness constraint rejected the write.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
