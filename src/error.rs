use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use field_engine::EngineError;
use serde_json::json;
use thiserror::Error;

use crate::services::positions::PositionsError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Canvas too large: {width}x{height} (max {max} per side)")]
    CanvasTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Image error: {0}")]
    Persist(#[from] PersistError),

    #[error("Positions error: {0}")]
    Positions(#[from] PositionsError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("worker task failed: {e}"))
    }
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG layout: {0}")]
    Unsupported(String),

    #[error("Image dimensions {width}x{height} exceed the PNG limit")]
    TooLarge { width: usize, height: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PersistError {
    /// Whether the error was caused by the input rather than by the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PersistError::PngEncode(_) | PersistError::Io(_))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::CanvasTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Engine(EngineError::EmptyStore) => StatusCode::CONFLICT,
            ApiError::Engine(_) => StatusCode::BAD_REQUEST,
            ApiError::Persist(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Positions(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
