pub mod exam_service;
pub mod participant_service;
pub mod result_service;
pub mod roll_service;
pub mod schema_service;
pub mod scoring_service;
