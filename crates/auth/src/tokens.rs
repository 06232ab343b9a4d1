//! Token issuance and validation.
//!
//! The `TokenIssuer` trait is the injection seam: services depend on the
//! trait, the API wires in the HS256 implementation, and tests can substitute
//! their own.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use gatekey_core::AccountId;

use crate::{Role, TokenClaims, TokenPurpose, validate_claims};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token encoding failed: {0}")]
    Encode(String),

    #[error("invalid token")]
    Invalid,
}

/// A freshly minted token together with its claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Mints and validates bearer tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(
        &self,
        sub: AccountId,
        role: Role,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError>;

    /// Decode + verify signature, then validate the claim window and purpose
    /// at `now`.
    fn validate(
        &self,
        token: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError>;
}

/// HS256 JWT issuer backed by a shared secret.
pub struct Hs256TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl TokenIssuer for Hs256TokenIssuer {
    fn issue(
        &self,
        sub: AccountId,
        role: Role,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub,
            role,
            purpose,
            jti: Uuid::now_v7().to_string(),
            issued_at: now,
            expires_at: now + ttl,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    fn validate(
        &self,
        token: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        // Expiry lives in our own claim fields (RFC3339 timestamps), so the
        // registered `exp` check is disabled and the window is validated below.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;

        validate_claims(&data.claims, purpose, now).map_err(|_| TokenError::Invalid)?;

        Ok(data.claims)
    }
}
