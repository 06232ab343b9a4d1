//! `gatekey-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. It owns the
//! role model, the access-control policy, token claims and the contracts for
//! token issuance and credential verification.

pub mod claims;
pub mod credentials;
pub mod policy;
pub mod roles;
pub mod tokens;

pub use claims::{TokenClaims, TokenPurpose, TokenValidationError, validate_claims};
pub use credentials::{Argon2Verifier, CredentialError, CredentialVerifier};
pub use policy::{Decision, Operation, PolicyConfig, decide};
pub use roles::Role;
pub use tokens::{Hs256TokenIssuer, IssuedToken, TokenError, TokenIssuer};
