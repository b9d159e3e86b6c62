//! Error types for the registration server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cerimonia_core::{FlowError, StoreError};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Flow(FlowError::Store(e))
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Flow(e) => match e {
                FlowError::InvalidCpf(_) => (StatusCode::BAD_REQUEST, "INVALID_CPF"),
                FlowError::InvalidName => (StatusCode::BAD_REQUEST, "INVALID_NAME"),
                FlowError::InvalidEmail(_) => (StatusCode::BAD_REQUEST, "INVALID_EMAIL"),
                FlowError::EventNotFound(_) => (StatusCode::NOT_FOUND, "EVENT_NOT_FOUND"),
                FlowError::AttendeeNotFound => (StatusCode::NOT_FOUND, "ATTENDEE_NOT_FOUND"),
                FlowError::CpfAlreadyRegistered => {
                    (StatusCode::CONFLICT, "CPF_ALREADY_REGISTERED")
                }
                FlowError::InvalidTransition(_) => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
                FlowError::Store(StoreError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
                FlowError::Store(StoreError::Backend(_)) => {
                    (StatusCode::BAD_GATEWAY, "BACKEND_ERROR")
                }
            },
            ApiError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
