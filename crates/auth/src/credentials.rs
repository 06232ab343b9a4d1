//! Password hashing and verification.
//!
//! The `CredentialVerifier` trait is an injection seam so services never see
//! raw hashing primitives and tests can substitute counting stubs.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored hash is malformed: {0}")]
    MalformedHash(String),
}

/// Checks a submitted password against a stored hash.
pub trait CredentialVerifier: Send + Sync {
    /// Hash a new password into an opaque PHC string.
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// Verify a password against a stored PHC string.
    ///
    /// Returns `Ok(false)` on mismatch; errors are reserved for malformed
    /// stored hashes.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}

/// Argon2id verifier with default parameters.
#[derive(Debug, Default)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::MalformedHash(e.to_string())),
        }
    }
}
