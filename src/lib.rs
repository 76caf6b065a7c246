pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    exam_service::ExamService, participant_service::ParticipantService,
    result_service::ResultService, roll_service::RollService,
    schema_service::SchemaCapabilities,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub capabilities: SchemaCapabilities,
    pub roll_service: RollService,
    pub participant_service: ParticipantService,
    pub exam_service: ExamService,
    pub result_service: ResultService,
}

impl AppState {
    pub fn new(pool: PgPool, capabilities: SchemaCapabilities) -> Self {
        let roll_service = RollService::new(pool.clone());
        let participant_service = ParticipantService::new(pool.clone(), capabilities);
        let exam_service = ExamService::new(pool.clone(), capabilities);
        let result_service = ResultService::new(pool.clone());

        Self {
            pool,
            capabilities,
            roll_service,
            participant_service,
            exam_service,
            result_service,
        }
    }
}
