//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Only a message string ever reaches the client.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::error::GENERIC_MESSAGE;
use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Malformed request body or path (400)
    BadRequest { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: i64 },

    /// Login rejected (401)
    Unauthorized,

    /// Store unreachable (500, logged)
    Unavailable(DbError),

    /// Statement failed (500, logged)
    Database(DbError),

    /// Internal error (500)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Unavailable(_) | Self::Database(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(e) => json!({
                "error": "validation_error",
                "message": e.to_string()
            }),
            Self::BadRequest { message } => json!({
                "error": "bad_request",
                "message": message
            }),
            Self::NotFound { resource, id } => json!({
                "error": "not_found",
                "message": format!("{} {} not found", resource, id)
            }),
            Self::Unauthorized => json!({
                "error": "unauthorized",
                "message": "invalid credentials"
            }),
            Self::Unavailable(e) => {
                tracing::error!("Database unavailable: {}", e);
                json!({
                    "error": "unavailable",
                    "message": "database unavailable"
                })
            }
            Self::Database(e) => {
                tracing::error!("Database error: {}", e);
                json!({
                    "error": "database_error",
                    "message": e.client_message()
                })
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                json!({
                    "error": "internal_error",
                    "message": GENERIC_MESSAGE
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Connection(_) => Self::Unavailable(e),
            DbError::Hash(e) => Self::Internal {
                message: e.to_string(),
            },
            DbError::Persistence(_) => Self::Database(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::BadRequest {
            message: e.body_text(),
        }
    }
}
