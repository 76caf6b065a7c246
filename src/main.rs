use axum::{
    routing::{get, post},
    Router,
};
use exam_portal_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes,
    services::schema_service::SchemaCapabilities,
    AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let capabilities = SchemaCapabilities::detect(&pool).await?;
    info!(?capabilities, "schema capabilities detected");

    let app_state = AppState::new(pool, capabilities);

    let app = Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/participants/register",
            post(routes::participant_routes::register_participant),
        )
        .route(
            "/api/participants/next-roll/:class",
            get(routes::participant_routes::next_roll),
        )
        .route(
            "/api/participants",
            get(routes::participant_routes::list_participants),
        )
        .route(
            "/api/participants/class/:class",
            get(routes::participant_routes::list_participants_by_class),
        )
        .route(
            "/api/participants/school/:school",
            get(routes::participant_routes::list_participants_by_school),
        )
        .route(
            "/api/participants/school/:school/class/:class",
            get(routes::participant_routes::list_participants_by_school_and_class),
        )
        .route(
            "/api/participants/roll/:roll",
            get(routes::participant_routes::get_participant_by_roll),
        )
        .route(
            "/api/participants/:id",
            axum::routing::put(routes::participant_routes::update_participant)
                .delete(routes::participant_routes::delete_participant),
        )
        .route(
            "/api/exams",
            post(routes::exam_routes::create_exam).get(routes::exam_routes::list_exams),
        )
        .route(
            "/api/exams/:exam_id",
            get(routes::exam_routes::get_exam)
                .put(routes::exam_routes::update_exam)
                .delete(routes::exam_routes::delete_exam),
        )
        .route(
            "/api/exams/:exam_id/classes",
            post(routes::exam_routes::upsert_exam_class),
        )
        .route(
            "/api/exams/:exam_id/classes/:class_id",
            axum::routing::delete(routes::exam_routes::delete_exam_class),
        )
        .route(
            "/api/exams/:exam_id/classes/:class_id/answer-key",
            get(routes::exam_routes::get_answer_key),
        )
        .route(
            "/api/results/submit",
            post(routes::result_routes::submit_result).put(routes::result_routes::edit_result),
        )
        .route(
            "/api/results/submit/:participant_id/:exam_id",
            axum::routing::delete(routes::result_routes::delete_result),
        )
        .route(
            "/api/results/roll/:roll",
            get(routes::result_routes::get_results_by_roll),
        )
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
