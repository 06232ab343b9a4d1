use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatekey_core::AccountId;

use crate::Role;

/// What a token is allowed to be used for.
///
/// A token is valid only for its stated purpose; an access token can never
/// redeem an email verification and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenPurpose {
    Access,
    EmailVerify,
}

/// Token claims model (transport-agnostic).
///
/// This is the claim set gatekey expects once a token has been
/// decoded/verified by the signing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject account identifier.
    pub sub: AccountId,

    /// Role granted at issuance time.
    pub role: Role,

    /// Purpose the token was minted for.
    pub purpose: TokenPurpose,

    /// Unique token id (single-use enforcement for verification tokens).
    pub jti: String,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("token purpose mismatch")]
    WrongPurpose,
}

/// Deterministically validate token claims.
///
/// Note: this validates the *claims* only. Signature verification/decoding is
/// the issuer's concern (see `tokens`).
pub fn validate_claims(
    claims: &TokenClaims,
    expected_purpose: TokenPurpose,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    if claims.purpose != expected_purpose {
        return Err(TokenValidationError::WrongPurpose);
    }
    Ok(())
}
