//! Access-control policy.
//!
//! A single pure decision function over (actor role, actor id, target id,
//! operation). No IO, no panics, no business logic beyond the decision.

use serde::{Deserialize, Serialize};

use gatekey_core::AccountId;

use crate::Role;

/// Operations subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Read the caller's own profile through the elevated `/users/me` endpoint.
    ReadSelf,
    /// Update the caller's own profile through the elevated `/users/me` endpoint.
    UpdateSelf,
    /// Toggle the professional flag on any account.
    SetProfessionalStatus,
    /// Create an account on behalf of someone else.
    Create,
    ReadById,
    UpdateById,
    DeleteById,
    List,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::ReadSelf,
        Operation::UpdateSelf,
        Operation::SetProfessionalStatus,
        Operation::Create,
        Operation::ReadById,
        Operation::UpdateById,
        Operation::DeleteById,
        Operation::List,
    ];
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Deployment-level policy knobs.
///
/// `owner_crud` controls whether a plain `AUTHENTICATED` account may
/// read/update/delete its own record through the by-id endpoints. The default
/// is off (staff-only), which is the deployment the route tests exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicyConfig {
    pub owner_crud: bool,
}

/// Decide whether `actor` may perform `operation` on `target`.
///
/// Total over every (role, operation) pair: there are no undefined cases.
pub fn decide(
    role: Role,
    actor: AccountId,
    target: Option<AccountId>,
    operation: Operation,
    config: &PolicyConfig,
) -> Decision {
    match role {
        // Staff roles: full access to every operation in this surface.
        Role::Admin | Role::Manager => Decision::Allow,

        Role::Authenticated => match operation {
            Operation::ReadSelf
            | Operation::UpdateSelf
            | Operation::SetProfessionalStatus
            | Operation::Create
            | Operation::List => Decision::Deny,

            Operation::ReadById | Operation::UpdateById | Operation::DeleteById => {
                if config.owner_crud && target == Some(actor) {
                    Decision::Allow
                } else {
                    Decision::Deny
                }
            }
        },
    }
}
