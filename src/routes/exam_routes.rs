use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::exam_dto::{
    CreateExamRequest, ExamWithClassesResponse, UpdateExamRequest, UpsertExamClassRequest,
};
use crate::AppState;

#[axum::debug_handler]
pub async fn create_exam(
    State(state): State<AppState>,
    Json(payload): Json<CreateExamRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let exam = state.exam_service.create_exam(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Exam created", "exam": exam })),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn list_exams(State(state): State<AppState>) -> crate::error::Result<Response> {
    let exams = state.exam_service.list_exams().await?;
    Ok(Json(exams).into_response())
}

#[axum::debug_handler]
pub async fn get_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let (exam, classes) = state.exam_service.get_exam_with_classes(exam_id).await?;
    Ok(Json(ExamWithClassesResponse { exam, classes }).into_response())
}

#[axum::debug_handler]
pub async fn update_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<Uuid>,
    Json(payload): Json<UpdateExamRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let exam = state.exam_service.update_exam(exam_id, payload).await?;
    Ok(Json(json!({ "message": "Exam updated", "exam": exam })).into_response())
}

/// Registers or replaces the per-class set for an exam.
#[axum::debug_handler]
pub async fn upsert_exam_class(
    State(state): State<AppState>,
    Path(exam_id): Path<Uuid>,
    Json(payload): Json<UpsertExamClassRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let exam_class = state.exam_service.upsert_exam_class(exam_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Exam class saved", "exam_class": exam_class })),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn get_answer_key(
    State(state): State<AppState>,
    Path((exam_id, class_id)): Path<(Uuid, Uuid)>,
) -> crate::error::Result<Response> {
    let answer_key = state.exam_service.get_answer_key(exam_id, class_id).await?;
    Ok(Json(json!({ "answer_key": answer_key })).into_response())
}

#[axum::debug_handler]
pub async fn delete_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    state.exam_service.delete_exam(exam_id).await?;
    Ok(Json(json!({ "message": "Exam deleted" })).into_response())
}

#[axum::debug_handler]
pub async fn delete_exam_class(
    State(state): State<AppState>,
    Path((exam_id, class_id)): Path<(Uuid, Uuid)>,
) -> crate::error::Result<Response> {
    state.exam_service.delete_exam_class(exam_id, class_id).await?;
    Ok(Json(json!({ "message": "Exam class deleted" })).into_response())
}
