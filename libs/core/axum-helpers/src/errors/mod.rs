pub mod handlers;
pub mod messages;
pub mod responses;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every error response.
///
/// Only a short, fixed message is exposed. Causes stay in the server logs.
///
/// # JSON Example
///
/// ```json
/// { "message": "failed to update user" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable, operation-scoped error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// HTTP-facing error.
///
/// The payload is the message sent to the client, so it must never carry
/// driver errors, identifiers or other internal detail. Log the cause where
/// the error is detected, then convert.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Request Timeout: {0}")]
    RequestTimeout(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::RequestTimeout(msg)
            | AppError::InternalServerError(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse::new(self.message()));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_app_error_renders_message_envelope() {
        let response = AppError::InternalServerError("failed to get users".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "failed to get users" }));
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(AppError::BadRequest(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound(String::new()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::RequestTimeout(String::new()).status(),
            StatusCode::REQUEST_TIMEOUT
        );
    }
}
