use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Sequence not found: {0}")]
    SequenceNotFound(String),

    #[error("Camera not found: {0}")]
    CameraNotFound(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("A sequence is already executing")]
    ExecutionInProgress,

    #[error("No active execution")]
    NoActiveExecution,

    #[error("Command error: {0}")]
    Command(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::VehicleNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Vehicle '{}' not found", id))
            }
            AppError::SequenceNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Sequence '{}' not found", id))
            }
            AppError::CameraNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Camera '{}' not found", id))
            }
            AppError::PreconditionFailed(reason) => (StatusCode::CONFLICT, reason),
            AppError::ExecutionInProgress => (
                StatusCode::CONFLICT,
                "A sequence is already executing".to_string(),
            ),
            AppError::NoActiveExecution => {
                (StatusCode::CONFLICT, "No active execution".to_string())
            }
            AppError::Command(e) => (StatusCode::BAD_REQUEST, e),
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        let body = json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
