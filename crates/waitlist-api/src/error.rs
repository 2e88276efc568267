//! Error types for the waitlist API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use waitlist_store::RegistrationError;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Consent must be given to join the waitlist")]
    ConsentRequired,

    #[error("This email is already on the waitlist.")]
    AlreadyRegistered(String),

    #[error("Email not found")]
    NotFound(String),

    #[error("Invalid JSON body")]
    MalformedRequest(String),

    #[error("Not found")]
    RouteNotFound,

    /// Detail is logged, never returned to the caller.
    #[error("Database error")]
    Storage(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::InvalidEmail => (StatusCode::BAD_REQUEST, "INVALID_EMAIL"),
            ApiError::ConsentRequired => (StatusCode::BAD_REQUEST, "CONSENT_REQUIRED"),
            ApiError::AlreadyRegistered(email) => {
                debug!(email = %email, "Signup rejected as duplicate");
                (StatusCode::BAD_REQUEST, "ALREADY_REGISTERED")
            }
            ApiError::NotFound(email) => {
                debug!(email = %email, "Removal of unknown email");
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            ApiError::MalformedRequest(reason) => {
                debug!(reason = %reason, "Unparseable request body");
                (StatusCode::BAD_REQUEST, "MALFORMED_REQUEST")
            }
            ApiError::RouteNotFound => (StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND"),
            ApiError::Storage(detail) => {
                error!(detail = %detail, "Storage fault");
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
        };

        let body = ErrorResponse {
            detail: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RegistrationError> for ApiError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::InvalidEmail => ApiError::InvalidEmail,
            RegistrationError::ConsentRequired => ApiError::ConsentRequired,
            RegistrationError::AlreadyRegistered(email) => ApiError::AlreadyRegistered(email),
            RegistrationError::NotFound(email) => ApiError::NotFound(email),
            RegistrationError::Storage(e) => ApiError::Storage(e.to_string()),
        }
    }
}
