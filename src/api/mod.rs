//! API module
//!
//! Contains HTTP request handlers for the catalog endpoints. Handlers are
//! thin: deserialize the request, call the service, serialize the result.

pub mod films;
pub mod genres;
pub mod mpa;
pub mod users;

use serde::Serialize;

/// Message response returned by delete and relationship endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator (e.g. "ok")
    pub status: String,
}

impl MessageResponse {
    /// Shorthand for an "ok" message
    pub fn ok(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status: "ok".to_string(),
        }
    }
}
