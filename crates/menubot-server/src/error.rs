//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::dto::ChatReply;

/// Application-level errors with HTTP status code mapping.
///
/// The message is what the client sees; underlying causes are logged where
/// the error is raised and never included here.
#[derive(Debug)]
pub enum AppError {
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ChatReply::new(message))).into_response()
    }
}
