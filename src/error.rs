//! Error types and error handling for the application
//!
//! This module defines the HTTP-facing error type. Every variant renders the
//! JSON envelope the cafe API has always returned for that situation.

use crate::cafe::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned when a POST body is missing or is not a JSON object
pub const INVALID_JSON_MESSAGE: &str = "No JSON data provided or invalid JSON format.";

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body or parameters were malformed
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The storage layer refused to insert a new cafe
    #[error("Could not create new cafe: {0}")]
    CreateFailed(#[source] StoreError),

    /// The body did not describe a row the cafe table accepts
    #[error("Could not create new cafe: {0}")]
    CafeRejected(String),

    /// The path named a cafe id that cannot exist (not an integer)
    #[error("Cafe not found: {0}")]
    UnknownCafe(String),

    /// A random cafe was requested but the catalogue is empty
    #[error("No cafes in the catalogue")]
    EmptyCatalogue,

    /// Repository error outside of cafe creation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": { "Bad Request": message } }),
            ),
            AppError::CreateFailed(_) | AppError::CafeRejected(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "response": { "error": "Could not create new cafe." } }),
            ),
            AppError::EmptyCatalogue => (
                StatusCode::NOT_FOUND,
                json!({ "error": { "Not Found": "Sorry, we don't have any cafes yet." } }),
            ),
            AppError::Store(StoreError::NotFound(id)) => not_found(&id.to_string()),
            AppError::UnknownCafe(raw_id) => not_found(raw_id),
            AppError::Store(StoreError::Conflict(_) | StoreError::Unavailable(_))
            | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": { "message": self.to_string() } }),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        (status, Json(body)).into_response()
    }
}

fn not_found(id: &str) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::NOT_FOUND,
        json!({ "error": { "message": format!("cafe with id {} not found.", id) } }),
    )
}
