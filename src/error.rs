use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::board::BoardError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("a fetch is already in flight")]
    IngestInFlight,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::OrderNotFound(_) => AppError::NotFound(err.to_string()),
            BoardError::UnknownDriver(_) | BoardError::InvalidDraft(_) => {
                AppError::BadRequest(err.to_string())
            }
            BoardError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            BoardError::DuplicateOrder(_)
            | BoardError::DuplicateInvoice(_)
            | BoardError::DuplicateDriver(_)
            | BoardError::CounterExhausted(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::IngestInFlight => (
                StatusCode::CONFLICT,
                "a fetch is already in flight".to_string(),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
