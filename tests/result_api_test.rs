mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use exam_portal_backend::services::schema_service::SchemaCapabilities;
use exam_portal_backend::{routes, AppState};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/participants/register",
            post(routes::participant_routes::register_participant),
        )
        .route(
            "/api/participants/next-roll/:class",
            get(routes::participant_routes::next_roll),
        )
        .route(
            "/api/results/submit",
            post(routes::result_routes::submit_result),
        )
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse body")
}

#[tokio::test]
async fn register_and_submit_over_http() {
    let Some(pool) = common::try_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let state = AppState::new(pool.clone(), SchemaCapabilities::full());

    let response = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/participants/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "name": "Http Register",
                        "school": "Test High School",
                        "class_level": "10",
                        "phone": "01700000000",
                        "entry_fee": "100"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let roll = body["participant"]["roll_number"].as_str().unwrap();
    assert!(roll.starts_with("101"));
    assert_eq!(body["participant"]["password"], JsonValue::Null);
    assert!(!body["temp_password"].as_str().unwrap().is_empty());
    assert_eq!(body["degraded_roll"], json!(false));

    // Submitting against an exam that does not exist maps to a typed 404.
    let participant_id = body["participant"]["id"].as_str().unwrap().to_string();
    let response = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/results/submit")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "participant_id": participant_id,
                        "exam_id": Uuid::new_v4(),
                        "class_id": Uuid::new_v4(),
                        "answers": {"1": "A"}
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("not_found"));

    let id: Uuid = participant_id.parse().unwrap();
    state
        .participant_service
        .delete(id)
        .await
        .expect("cleanup participant");
}

#[tokio::test]
async fn next_roll_rejects_unknown_class_with_typed_error() {
    let Some(pool) = common::try_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let state = AppState::new(pool, SchemaCapabilities::full());

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/participants/next-roll/13")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], json!("invalid_class"));
}
