//! Error types for engine setup.
//!
//! Per-tick degraded input (missing keypoints, empty spectrum, failed
//! estimates) never surfaces here; it resolves to "no event this tick".

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pose model unavailable: {0}")]
    PoseModel(String),

    #[error("Pose estimation failed: {0}")]
    Estimation(String),

    #[error("Catalog contains no entries")]
    EmptyCatalog,
}

pub type Result<T> = std::result::Result<T, EngineError>;
