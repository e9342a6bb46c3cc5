//! JSON extractor with automatic validation using the validator crate.

use crate::errors::{AppError, messages};
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// A body that does not decode into `T`, or decodes but fails
/// `T::validate`, is rejected with 400 and
/// `{"message": "failed to parse request body"}`. The detailed cause is
/// logged at warn level only.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateUser {
///     #[validate(length(min = 1))]
///     email: String,
/// }
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> String {
///     payload.email
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::warn!(error = %e.body_text(), "Rejected request body");
            AppError::BadRequest(messages::PARSE_BODY_FAILED.to_string())
        })?;

        data.validate().map_err(|e| {
            tracing::warn!(error = %e, "Request body failed validation");
            AppError::BadRequest(messages::PARSE_BODY_FAILED.to_string())
        })?;

        Ok(ValidatedJson(data))
    }
}
