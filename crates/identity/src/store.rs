//! Account persistence contract and the in-memory implementation.
//!
//! The store is the one external transactional collaborator: each method is
//! an atomic read-modify-write over a single account row.

use std::collections::HashMap;
use std::sync::RwLock;

use gatekey_core::{AccountId, IdentityError, IdentityResult};

use crate::account::Account;

/// Account CRUD contract, injected into the services.
pub trait AccountStore: Send + Sync {
    /// Insert a new account. Fails with `DuplicateEmail` if the email is
    /// already present; nothing is created in that case.
    fn insert(&self, account: Account) -> IdentityResult<()>;

    fn get(&self, id: AccountId) -> Option<Account>;

    fn get_by_email(&self, email: &str) -> Option<Account>;

    /// Atomically read-modify-write a single account row.
    ///
    /// The closure runs while the row is exclusively held, so counter
    /// updates from overlapping requests cannot lose increments. Returns the
    /// post-mutation account, or `NotFound` if absent.
    fn with_account_mut(
        &self,
        id: AccountId,
        f: &mut dyn FnMut(&mut Account),
    ) -> IdentityResult<Account>;

    /// Remove an account, returning whether it existed.
    fn remove(&self, id: AccountId) -> bool;

    /// Page of accounts (ordered by id) plus the total count.
    fn list(&self, skip: usize, limit: usize) -> (Vec<Account>, usize);

    fn count(&self) -> usize;
}

/// In-memory store behind an `RwLock`; suitable for tests and single-node
/// deployments.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn insert(&self, account: Account) -> IdentityResult<()> {
        let mut map = self.inner.write().unwrap();
        if map.values().any(|a| a.email == account.email) {
            return Err(IdentityError::DuplicateEmail);
        }
        map.insert(account.id, account);
        Ok(())
    }

    fn get(&self, id: AccountId) -> Option<Account> {
        self.inner.read().unwrap().get(&id).cloned()
    }

    fn get_by_email(&self, email: &str) -> Option<Account> {
        let email = email.trim().to_lowercase();
        self.inner
            .read()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned()
    }

    fn with_account_mut(
        &self,
        id: AccountId,
        f: &mut dyn FnMut(&mut Account),
    ) -> IdentityResult<Account> {
        let mut map = self.inner.write().unwrap();
        match map.get_mut(&id) {
            Some(account) => {
                f(account);
                Ok(account.clone())
            }
            None => Err(IdentityError::NotFound),
        }
    }

    fn remove(&self, id: AccountId) -> bool {
        self.inner.write().unwrap().remove(&id).is_some()
    }

    fn list(&self, skip: usize, limit: usize) -> (Vec<Account>, usize) {
        let map = self.inner.read().unwrap();
        let total = map.len();

        // UUIDv7 ids are time-ordered, so id order is creation order.
        let mut all: Vec<&Account> = map.values().collect();
        all.sort_by_key(|a| *a.id.as_uuid());

        let page = all.into_iter().skip(skip).take(limit).cloned().collect();
        (page, total)
    }

    fn count(&self) -> usize {
        self.inner.read().unwrap().len()
    }
}
