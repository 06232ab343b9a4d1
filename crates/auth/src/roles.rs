use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// The role set is closed: every account holds exactly one of these, and the
/// policy layer matches on them exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Authenticated,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Authenticated => "AUTHENTICATED",
        }
    }

    /// True for roles with elevated (staff-level) access.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = gatekey_core::IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MANAGER" => Ok(Role::Manager),
            "AUTHENTICATED" => Ok(Role::Authenticated),
            other => Err(gatekey_core::IdentityError::validation(format!(
                "unknown role: {other}"
            ))),
        }
    }
}
