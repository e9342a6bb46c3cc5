//! Query-string extractor with validation.

use crate::errors::{AppError, messages};
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Like [`axum::extract::Query`], but runs `T::validate` and rejects with 400
/// and `{"message": "invalid query parameters"}` on any failure.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e.body_text(), "Rejected query string");
                AppError::BadRequest(messages::INVALID_QUERY.to_string())
            })?;

        data.validate().map_err(|e| {
            tracing::warn!(error = %e, "Query string failed validation");
            AppError::BadRequest(messages::INVALID_QUERY.to_string())
        })?;

        Ok(ValidatedQuery(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, extract::Request, http::StatusCode, routing::get};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Paging {
        #[serde(default)]
        page: u64,
        #[validate(range(min = 1, max = 100))]
        #[serde(default = "default_limit")]
        limit: i64,
    }

    fn default_limit() -> i64 {
        10
    }

    async fn status_for(uri: &str) -> StatusCode {
        let app = Router::new().route(
            "/",
            get(|ValidatedQuery(q): ValidatedQuery<Paging>| async move {
                format!("{}:{}", q.page, q.limit)
            }),
        );
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_defaults_apply() {
        assert_eq!(status_for("/").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_numeric_is_rejected() {
        assert_eq!(status_for("/?page=abc").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_out_of_range_is_rejected() {
        assert_eq!(status_for("/?limit=0").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_for("/?limit=101").await, StatusCode::BAD_REQUEST);
    }
}
