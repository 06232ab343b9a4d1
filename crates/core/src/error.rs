//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Each variant
/// maps to exactly one HTTP status at the API boundary; `NotFound` and
/// `AccessDenied` are distinct on purpose and must never be conflated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Registration or admin-create targeted an email that is already taken.
    #[error("email already registered")]
    DuplicateEmail,

    /// Password verification failed for an unlocked account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account is locked; credential verification was not attempted.
    #[error("account locked")]
    AccountLocked,

    /// A token was expired, malformed, replayed, or used for the wrong purpose.
    #[error("invalid or expired token")]
    InvalidToken,

    /// A requested account was not found.
    #[error("not found")]
    NotFound,

    /// The access-control policy denied the operation.
    #[error("access denied")]
    AccessDenied,

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl IdentityError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
