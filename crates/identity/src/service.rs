//! Service orchestration over the lifecycle state machine.
//!
//! `AuthService` owns registration/login/verification; `ProfileService` owns
//! policy-gated account CRUD. Collaborators arrive via constructor injection
//! as trait objects so tests can substitute them.

use std::sync::Arc;

use chrono::{Duration, Utc};

use gatekey_auth::{
    CredentialVerifier, Decision, IssuedToken, Operation, PolicyConfig, Role, TokenIssuer,
    TokenPurpose, decide,
};
use gatekey_core::{AccountId, IdentityError, IdentityResult};

use crate::account::{Account, ProfilePatch};
use crate::mail::MailSender;
use crate::store::AccountStore;

/// Tunables shared by both services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Failed-login count at which the account locks.
    pub max_failed_logins: u32,
    pub access_token_ttl: Duration,
    pub verification_token_ttl: Duration,
    pub policy: PolicyConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_failed_logins: 5,
            access_token_ttl: Duration::minutes(30),
            verification_token_ttl: Duration::hours(24),
            policy: PolicyConfig::default(),
        }
    }
}

/// The authenticated caller of a profile operation, derived from an access
/// token by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: AccountId,
    pub role: Role,
}

/// Registration, login and email-verification flows.
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    credentials: Arc<dyn CredentialVerifier>,
    tokens: Arc<dyn TokenIssuer>,
    mail: Arc<dyn MailSender>,
    config: ServiceConfig,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        credentials: Arc<dyn CredentialVerifier>,
        tokens: Arc<dyn TokenIssuer>,
        mail: Arc<dyn MailSender>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            credentials,
            tokens,
            mail,
            config,
        }
    }

    /// Register a new account in `UNVERIFIED`/unlocked state and dispatch a
    /// verification email. A duplicate email creates nothing.
    pub fn register(&self, email: &str, password: &str, role: Role) -> IdentityResult<Account> {
        let hash = self
            .credentials
            .hash(password)
            .map_err(|e| IdentityError::validation(e.to_string()))?;

        let mut account = Account::new(email, hash, role, Utc::now())?;

        let issued = self
            .tokens
            .issue(
                account.id,
                role,
                TokenPurpose::EmailVerify,
                self.config.verification_token_ttl,
            )
            .map_err(|_| IdentityError::InvalidToken)?;
        account.begin_verification(issued.claims.jti.clone());

        self.store.insert(account.clone())?;

        self.mail
            .send_verification(&account.email, account.id, &issued.token);

        tracing::info!(account_id = %account.id, role = %role, "account registered");
        Ok(account)
    }

    /// Login with email/password.
    ///
    /// The lock check strictly precedes credential verification: a locked
    /// account never reaches the verifier. Counter updates go through the
    /// store's atomic mutate so overlapping attempts cannot lose increments.
    pub fn login(&self, email: &str, password: &str) -> IdentityResult<IssuedToken> {
        let account = self
            .store
            .get_by_email(email)
            .ok_or(IdentityError::InvalidCredentials)?;

        if account.locked {
            tracing::warn!(account_id = %account.id, "login rejected: account locked");
            return Err(IdentityError::AccountLocked);
        }

        let ok = self
            .credentials
            .verify(password, &account.password_hash)
            .map_err(|e| {
                tracing::error!(account_id = %account.id, error = %e, "credential check failed");
                IdentityError::InvalidCredentials
            })?;

        if !ok {
            let threshold = self.config.max_failed_logins;
            let updated = self.store.with_account_mut(account.id, &mut |a| {
                a.record_failed_login(threshold, Utc::now());
            })?;
            if updated.locked {
                tracing::warn!(account_id = %account.id, "account locked after failed attempts");
            }
            return Err(IdentityError::InvalidCredentials);
        }

        let account = self.store.with_account_mut(account.id, &mut |a| {
            a.record_successful_login(Utc::now());
        })?;

        self.tokens
            .issue(
                account.id,
                account.role,
                TokenPurpose::Access,
                self.config.access_token_ttl,
            )
            .map_err(|_| IdentityError::InvalidToken)
    }

    /// Redeem an email-verification token for the given account.
    ///
    /// Any failure (bad signature, expiry, wrong purpose, subject mismatch,
    /// replay) maps to `InvalidToken` with no state change.
    pub fn verify_email(&self, account_id: AccountId, token: &str) -> IdentityResult<Account> {
        let claims = self
            .tokens
            .validate(token, TokenPurpose::EmailVerify, Utc::now())
            .map_err(|_| IdentityError::InvalidToken)?;

        if claims.sub != account_id {
            return Err(IdentityError::InvalidToken);
        }

        let mut redeemed = Err(IdentityError::InvalidToken);
        let account = self
            .store
            .with_account_mut(account_id, &mut |a| {
                redeemed = a.redeem_verification(&claims.jti, Utc::now());
            })
            .map_err(|_| IdentityError::InvalidToken)?;
        redeemed?;

        tracing::info!(account_id = %account.id, "email verified");
        Ok(account)
    }
}

/// Policy-gated account CRUD.
pub struct ProfileService {
    store: Arc<dyn AccountStore>,
    credentials: Arc<dyn CredentialVerifier>,
    config: ServiceConfig,
}

impl ProfileService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        credentials: Arc<dyn CredentialVerifier>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            credentials,
            config,
        }
    }

    fn authorize(
        &self,
        actor: Actor,
        target: Option<AccountId>,
        operation: Operation,
    ) -> IdentityResult<()> {
        match decide(actor.role, actor.id, target, operation, &self.config.policy) {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(IdentityError::AccessDenied),
        }
    }

    /// `GET /users/me` semantics: elevated roles only.
    pub fn get_self(&self, actor: Actor) -> IdentityResult<Account> {
        self.authorize(actor, Some(actor.id), Operation::ReadSelf)?;
        self.store.get(actor.id).ok_or(IdentityError::NotFound)
    }

    /// `PATCH /users/me` semantics: elevated roles only.
    pub fn update_self(&self, actor: Actor, patch: ProfilePatch) -> IdentityResult<Account> {
        self.authorize(actor, Some(actor.id), Operation::UpdateSelf)?;
        self.store.with_account_mut(actor.id, &mut |a| {
            a.apply_patch(patch.clone(), Utc::now());
        })
    }

    /// Toggle the professional flag on any account.
    ///
    /// Authorization is checked before the target lookup: an unauthorized
    /// actor gets `AccessDenied` whether or not the target exists.
    pub fn set_professional_status(
        &self,
        actor: Actor,
        target_id: AccountId,
        value: bool,
    ) -> IdentityResult<Account> {
        self.authorize(actor, Some(target_id), Operation::SetProfessionalStatus)?;
        self.store.with_account_mut(target_id, &mut |a| {
            a.set_professional(value, Utc::now());
        })
    }

    /// Admin-create an account. Duplicate emails create nothing.
    pub fn create(
        &self,
        actor: Actor,
        email: &str,
        password: &str,
        role: Role,
    ) -> IdentityResult<Account> {
        self.authorize(actor, None, Operation::Create)?;

        if self.store.get_by_email(email).is_some() {
            return Err(IdentityError::DuplicateEmail);
        }

        let hash = self
            .credentials
            .hash(password)
            .map_err(|e| IdentityError::validation(e.to_string()))?;
        let account = Account::new(email, hash, role, Utc::now())?;
        self.store.insert(account.clone())?;
        Ok(account)
    }

    pub fn get_by_id(&self, actor: Actor, id: AccountId) -> IdentityResult<Account> {
        self.authorize(actor, Some(id), Operation::ReadById)?;
        self.store.get(id).ok_or(IdentityError::NotFound)
    }

    pub fn get_by_email(&self, actor: Actor, email: &str) -> IdentityResult<Account> {
        self.authorize(actor, None, Operation::ReadById)?;
        self.store.get_by_email(email).ok_or(IdentityError::NotFound)
    }

    pub fn update_by_id(
        &self,
        actor: Actor,
        id: AccountId,
        patch: ProfilePatch,
    ) -> IdentityResult<Account> {
        self.authorize(actor, Some(id), Operation::UpdateById)?;
        self.store.with_account_mut(id, &mut |a| {
            a.apply_patch(patch.clone(), Utc::now());
        })
    }

    pub fn delete(&self, actor: Actor, id: AccountId) -> IdentityResult<()> {
        self.authorize(actor, Some(id), Operation::DeleteById)?;
        if self.store.remove(id) {
            Ok(())
        } else {
            Err(IdentityError::NotFound)
        }
    }

    /// Page of accounts plus the total count.
    pub fn list(
        &self,
        actor: Actor,
        skip: usize,
        limit: usize,
    ) -> IdentityResult<(Vec<Account>, usize)> {
        self.authorize(actor, None, Operation::List)?;
        Ok(self.store.list(skip, limit))
    }
}
