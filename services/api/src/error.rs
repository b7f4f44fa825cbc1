//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// A single failed validation check, with the field path it applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request payload failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Missing or invalid credential
    #[error("Unauthorized")]
    Unauthorized,

    /// Login with unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing or not-owned resource; the two cases are not distinguished
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness violation
    #[error("{0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error")]
    Internal,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "details": field_details(&errors),
                }),
            ),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({"error": "Unauthorized"})),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "Invalid credentials"}),
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                json!({"error": format!("{} not found", resource)}),
            ),
            ApiError::Conflict(message) => (StatusCode::BAD_REQUEST, json!({"error": message})),
            ApiError::Internal | ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Internal server error"}),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Join field errors into a single details string for the response body
fn field_details(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
