use gatekey_auth::Role;
use gatekey_core::AccountId;
use gatekey_identity::Actor;

/// Principal context for a request (authenticated identity + role).
///
/// Inserted by the auth middleware; present on all protected routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    account_id: AccountId,
    role: Role,
}

impl PrincipalContext {
    pub fn new(account_id: AccountId, role: Role) -> Self {
        Self { account_id, role }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn actor(&self) -> Actor {
        Actor {
            id: self.account_id,
            role: self.role,
        }
    }
}
