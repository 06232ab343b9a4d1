//! Account model.
//!
//! # Invariants
//! - Email is unique across all accounts (enforced by the store).
//! - Role is one of the closed enum set.
//! - `failed_logins` resets to zero on successful login.
//! - Lock state is orthogonal to verification state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatekey_auth::Role;
use gatekey_core::{AccountId, IdentityError, IdentityResult};

/// Email-verification state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationState {
    #[default]
    Unverified,
    Verified,
}

/// Free-form, mutable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Profile {
    pub nickname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
}

/// Partial profile update; `None` leaves the field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct ProfilePatch {
    pub nickname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.profile_picture_url.is_none()
            && self.github_profile_url.is_none()
            && self.linkedin_profile_url.is_none()
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    /// Opaque PHC string; only the credential verifier interprets it.
    pub password_hash: String,
    pub role: Role,
    pub verification: VerificationState,
    pub locked: bool,
    pub failed_logins: u32,
    pub is_professional: bool,
    pub profile: Profile,
    /// `jti` of the outstanding email-verification token, if any.
    /// Cleared on redemption so verification tokens are single-use.
    pub pending_verification: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new unverified, unlocked account.
    ///
    /// The email is trimmed and lowercased; a minimal shape check rejects
    /// obviously malformed addresses.
    pub fn new(
        email: &str,
        password_hash: String,
        role: Role,
        now: DateTime<Utc>,
    ) -> IdentityResult<Self> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(IdentityError::validation("invalid email format"));
        }

        Ok(Self {
            id: AccountId::new(),
            email,
            password_hash,
            role,
            verification: VerificationState::Unverified,
            locked: false,
            failed_logins: 0,
            is_professional: false,
            profile: Profile::default(),
            pending_verification: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        })
    }

    pub fn is_verified(&self) -> bool {
        self.verification == VerificationState::Verified
    }
}
