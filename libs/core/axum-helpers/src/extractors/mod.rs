//! Custom extractors for Axum handlers.
//!
//! Both reject with [`crate::AppError::BadRequest`], so a malformed request
//! is answered with the standard error envelope.

pub mod validated_json;
pub mod validated_query;

pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
