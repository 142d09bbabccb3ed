//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::features::PreprocessingError;
use crate::inference::InferenceError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or out-of-range input (client's fault)
    #[error("{0}")]
    ValidationError(String),

    /// Payload could not be turned into model input
    #[error("Preprocessing error: {0}")]
    PreprocessingError(#[from] PreprocessingError),

    /// Model execution failed or produced unusable output
    #[error("Prediction error: {0}")]
    InferenceError(#[from] InferenceError),

    /// Service artifacts were never loaded
    #[error("{0} model is not loaded")]
    NotReadyError(&'static str),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotReadyError(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::PreprocessingError(_)
            | AppError::InferenceError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        if status.is_server_error() {
            tracing::error!("{} ({})", detail, status.as_u16());
        } else {
            tracing::debug!("Rejected request: {}", detail);
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("inference task failed: {}", err))
    }
}
