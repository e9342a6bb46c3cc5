use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::{AppError, messages};

/// Fallback handler for unmatched routes.
pub async fn not_found() -> Response {
    AppError::NotFound(messages::ROUTE_NOT_FOUND.to_string()).into_response()
}

/// Gives the bare 408 produced by the timeout layer the error envelope.
///
/// Use with `axum::middleware::map_response`, outside the timeout layer.
pub async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        tracing::warn!("request exceeded its deadline");
        return AppError::RequestTimeout(messages::REQUEST_TIMED_OUT.to_string()).into_response();
    }
    response
}
