use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::participant_dto::{
    NextRollResponse, RegisterParticipantRequest, RegisterParticipantResponse,
    UpdateParticipantRequest,
};
use crate::error::Error;
use crate::models::class_level::ClassLevel;
use crate::services::participant_service::ParticipantFilter;
use crate::AppState;

#[axum::debug_handler]
pub async fn register_participant(
    State(state): State<AppState>,
    Json(payload): Json<RegisterParticipantRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let registered = state.participant_service.register(payload).await?;
    let response = RegisterParticipantResponse {
        participant: registered.participant,
        temp_password: registered.temp_password,
        degraded_roll: registered.degraded_roll,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Read-only preview of the next roll for a class. No row is reserved;
/// registration re-allocates under the class lock.
#[axum::debug_handler]
pub async fn next_roll(
    State(state): State<AppState>,
    Path(class): Path<String>,
) -> crate::error::Result<Response> {
    let class = ClassLevel::from_designator(&class).ok_or(Error::InvalidClass(class))?;
    let allocation = state.roll_service.allocate(class).await?;
    let response = NextRollResponse {
        class_level: class.designator().to_string(),
        roll_number: allocation.roll_number().to_string(),
        degraded: allocation.is_degraded(),
    };
    Ok(Json(response).into_response())
}

#[axum::debug_handler]
pub async fn get_participant_by_roll(
    State(state): State<AppState>,
    Path(roll): Path<String>,
) -> crate::error::Result<Response> {
    let participant = state.participant_service.get_by_roll(&roll).await?;
    Ok(Json(participant).into_response())
}

#[axum::debug_handler]
pub async fn list_participants(
    State(state): State<AppState>,
) -> crate::error::Result<Response> {
    let participants = state
        .participant_service
        .list(ParticipantFilter::default())
        .await?;
    Ok(Json(participants).into_response())
}

#[axum::debug_handler]
pub async fn list_participants_by_class(
    State(state): State<AppState>,
    Path(class): Path<String>,
) -> crate::error::Result<Response> {
    let participants = state
        .participant_service
        .list(ParticipantFilter {
            class_level: Some(class),
            school: None,
        })
        .await?;
    Ok(Json(participants).into_response())
}

#[axum::debug_handler]
pub async fn list_participants_by_school(
    State(state): State<AppState>,
    Path(school): Path<String>,
) -> crate::error::Result<Response> {
    let participants = state
        .participant_service
        .list(ParticipantFilter {
            class_level: None,
            school: Some(school),
        })
        .await?;
    Ok(Json(participants).into_response())
}

#[axum::debug_handler]
pub async fn list_participants_by_school_and_class(
    State(state): State<AppState>,
    Path((school, class)): Path<(String, String)>,
) -> crate::error::Result<Response> {
    let participants = state
        .participant_service
        .list(ParticipantFilter {
            class_level: Some(class),
            school: Some(school),
        })
        .await?;
    Ok(Json(participants).into_response())
}

#[axum::debug_handler]
pub async fn update_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateParticipantRequest>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let participant = state.participant_service.update(id, payload).await?;
    Ok(Json(json!({ "message": "Participant updated", "participant": participant })).into_response())
}

#[axum::debug_handler]
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    state.participant_service.delete(id).await?;
    Ok(Json(json!({ "message": "Participant deleted" })).into_response())
}
