use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::result_dto::{EditResultRequest, SubmitResultRequest};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/results/submit",
    request_body = SubmitResultRequest,
    responses(
        (status = 201, description = "Answers evaluated and result stored"),
        (status = 400, description = "Invalid answer key"),
        (status = 404, description = "No matching exam class for this participant"),
    ),
)]
pub async fn submit_result(
    State(state): State<AppState>,
    Json(payload): Json<SubmitResultRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let result = state
        .result_service
        .submit(
            payload.participant_id,
            payload.exam_id,
            payload.class_id,
            &payload.answers,
            payload.submitted_by.as_deref(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Result submitted and evaluated", "result": result })),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/results/submit",
    request_body = EditResultRequest,
    responses(
        (status = 200, description = "Result re-evaluated"),
        (status = 404, description = "No existing result to edit"),
    ),
)]
pub async fn edit_result(
    State(state): State<AppState>,
    Json(payload): Json<EditResultRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let result = state
        .result_service
        .edit(
            payload.participant_id,
            payload.exam_id,
            payload.class_id,
            &payload.answers,
        )
        .await?;
    Ok(Json(json!({ "message": "Result updated", "result": result })).into_response())
}

#[axum::debug_handler]
pub async fn delete_result(
    State(state): State<AppState>,
    Path((participant_id, exam_id)): Path<(Uuid, Uuid)>,
) -> crate::error::Result<Response> {
    state.result_service.delete(participant_id, exam_id).await?;
    Ok(Json(json!({ "message": "Result deleted" })).into_response())
}

#[axum::debug_handler]
pub async fn get_results_by_roll(
    State(state): State<AppState>,
    Path(roll): Path<String>,
) -> crate::error::Result<Response> {
    let results = state.result_service.list_by_roll(&roll).await?;
    Ok(Json(results).into_response())
}
