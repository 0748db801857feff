//! Error types and error handling for the application
//!
//! This module defines the two domain error kinds (validation and not-found)
//! plus an internal catch-all. All errors implement `IntoResponse` to provide
//! consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Each variant implements automatic conversion to HTTP responses via
/// `IntoResponse`. Validation failures are always detected before any
/// mutation, so a 400 response implies zero state change.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input failed a domain constraint
    #[error("{0}")]
    Validation(String),

    /// A referenced entity id does not exist
    #[error("{entity} with id {id} does not exist")]
    NotFound {
        /// Kind of entity that was looked up (e.g. "film", "user")
        entity: &'static str,
        /// Id that failed to resolve
        id: i64,
    },

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
