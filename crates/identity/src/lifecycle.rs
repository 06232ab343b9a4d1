//! Account lifecycle state machine.
//!
//! State space: `{UNVERIFIED, VERIFIED} x {UNLOCKED, LOCKED}`. Lock is an
//! orthogonal axis driven by the failed-login counter; verification is driven
//! by token redemption. All transitions are pure mutations on `Account`; the
//! services persist the result through the store.

use chrono::{DateTime, Utc};

use gatekey_core::{IdentityError, IdentityResult};

use crate::account::{Account, ProfilePatch, VerificationState};

impl Account {
    /// Record a failed login attempt. Returns `true` if the account is now
    /// locked (the counter crossed `threshold`).
    pub fn record_failed_login(&mut self, threshold: u32, now: DateTime<Utc>) -> bool {
        self.failed_logins += 1;
        if self.failed_logins >= threshold {
            self.locked = true;
        }
        self.updated_at = now;
        self.locked
    }

    /// Record a successful login: counter resets to zero, last-login stamped.
    pub fn record_successful_login(&mut self, now: DateTime<Utc>) {
        self.failed_logins = 0;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Attach the outstanding email-verification token id.
    pub fn begin_verification(&mut self, jti: String) {
        self.pending_verification = Some(jti);
    }

    /// Redeem an email-verification token by its `jti`.
    ///
    /// Succeeds only when the jti matches the outstanding one; the pending
    /// token is cleared on success, so a replay fails the match. No state
    /// change on failure.
    pub fn redeem_verification(&mut self, jti: &str, now: DateTime<Utc>) -> IdentityResult<()> {
        match self.pending_verification.as_deref() {
            Some(pending) if pending == jti => {
                self.verification = VerificationState::Verified;
                self.pending_verification = None;
                self.updated_at = now;
                Ok(())
            }
            _ => Err(IdentityError::InvalidToken),
        }
    }

    /// Apply a partial profile update.
    pub fn apply_patch(&mut self, patch: ProfilePatch, now: DateTime<Utc>) {
        let p = &mut self.profile;
        if let Some(v) = patch.nickname {
            p.nickname = Some(v);
        }
        if let Some(v) = patch.first_name {
            p.first_name = Some(v);
        }
        if let Some(v) = patch.last_name {
            p.last_name = Some(v);
        }
        if let Some(v) = patch.bio {
            p.bio = Some(v);
        }
        if let Some(v) = patch.profile_picture_url {
            p.profile_picture_url = Some(v);
        }
        if let Some(v) = patch.github_profile_url {
            p.github_profile_url = Some(v);
        }
        if let Some(v) = patch.linkedin_profile_url {
            p.linkedin_profile_url = Some(v);
        }
        self.updated_at = now;
    }

    pub fn set_professional(&mut self, value: bool, now: DateTime<Utc>) {
        self.is_professional = value;
        self.updated_at = now;
    }
}
