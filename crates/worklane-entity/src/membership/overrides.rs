//! Per-membership permission overrides.

use serde::{Deserialize, Serialize};

use crate::permission::Permission;

/// Grant/revoke lists layered atop a member's role defaults.
///
/// Evaluation order is fixed: grants are unioned into the role's base set
/// first, then revocations are subtracted. Revocation therefore always
/// wins, even over an explicit grant of the same permission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverrides {
    /// Permissions granted beyond the role defaults.
    #[serde(default)]
    pub granted: Vec<Permission>,
    /// Permissions removed from the effective set.
    #[serde(default)]
    pub revoked: Vec<Permission>,
}

impl PermissionOverrides {
    /// An override that grants a single permission.
    pub fn grant(permission: Permission) -> Self {
        Self {
            granted: vec![permission],
            revoked: Vec::new(),
        }
    }

    /// An override that revokes a single permission.
    pub fn revoke(permission: Permission) -> Self {
        Self {
            granted: Vec::new(),
            revoked: vec![permission],
        }
    }

    /// Whether both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty() && self.revoked.is_empty()
    }
}
