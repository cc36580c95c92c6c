//! Shared primitives for all Rust crates in Custodian.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across Custodian crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller carries no verified identity.
    #[error("unauthenticated: {0}")]
    Unauthorized(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn validation_error_carries_message() {
        let error = AppError::Validation("PURGE_BATCH_SIZE must be between 1 and 500".to_owned());
        assert_eq!(
            error.to_string(),
            "validation error: PURGE_BATCH_SIZE must be between 1 and 500"
        );
    }

    #[test]
    fn unauthorized_error_mentions_unauthenticated() {
        let error = AppError::Unauthorized("user must be authenticated".to_owned());
        assert_eq!(
            error.to_string(),
            "unauthenticated: user must be authenticated"
        );
    }
}
