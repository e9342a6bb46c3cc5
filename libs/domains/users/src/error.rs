use axum_helpers::{AppError, errors::messages};
use thiserror::Error;

pub(crate) const ENCRYPT_PASSWORD_FAILED: &str = "failed to encrypt password";

#[derive(Debug, Error)]
pub enum UserError {
    /// Request data could not be decoded or failed validation
    #[error("invalid input: {0}")]
    Validation(String),

    /// Identifier is malformed or matches no record
    #[error("{0}")]
    NotFound(String),

    /// Any other store failure, with the driver cause folded into the text
    #[error("{0}")]
    Persistence(String),

    #[error("failed to encrypt password: {0}")]
    Hashing(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Logs the cause and converts to the client-facing error for an
    /// operation whose generic failure message is `operation_message`.
    ///
    /// Only validation (400) and hashing (its own 500 message) are told
    /// apart; not-found and persistence failures both become a 500 carrying
    /// `operation_message`.
    pub fn into_app_error(self, operation_message: &str) -> AppError {
        tracing::error!(error = %self, "{}", operation_message);

        match self {
            UserError::Validation(_) => {
                AppError::BadRequest(messages::PARSE_BODY_FAILED.to_string())
            }
            UserError::Hashing(_) => {
                AppError::InternalServerError(ENCRYPT_PASSWORD_FAILED.to_string())
            }
            UserError::NotFound(_) | UserError::Persistence(_) => {
                AppError::InternalServerError(operation_message.to_string())
            }
        }
    }
}
