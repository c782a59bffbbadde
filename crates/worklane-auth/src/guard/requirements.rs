//! Declarative access requirements.

use worklane_entity::membership::WorkspaceRole;
use worklane_entity::permission::Permission;

/// What a caller must hold for an operation to proceed.
///
/// Requirements are typed at construction, so an impossible requirement
/// (a permission that does not exist, a misspelled role) cannot be
/// expressed. Categories combine with AND; within the permission list,
/// [`AccessRequirements::require_all`] selects all-of versus any-of.
#[derive(Debug, Clone, Default)]
pub struct AccessRequirements {
    /// Permissions the caller must hold.
    pub permissions: Vec<Permission>,
    /// Exact roles accepted (any of).
    pub roles: Vec<WorkspaceRole>,
    /// Minimum role by privilege level.
    pub minimum_role: Option<WorkspaceRole>,
    /// Whether every listed permission is required, or any one suffices.
    pub require_all: bool,
}

impl AccessRequirements {
    /// No requirements beyond authentication.
    pub fn none() -> Self {
        Self::default()
    }

    /// Requires a single permission.
    pub fn permission(permission: Permission) -> Self {
        Self {
            permissions: vec![permission],
            ..Self::default()
        }
    }

    /// Requires at least one of the given permissions.
    pub fn any_permission(permissions: impl Into<Vec<Permission>>) -> Self {
        Self {
            permissions: permissions.into(),
            require_all: false,
            ..Self::default()
        }
    }

    /// Requires every one of the given permissions.
    pub fn all_permissions(permissions: impl Into<Vec<Permission>>) -> Self {
        Self {
            permissions: permissions.into(),
            require_all: true,
            ..Self::default()
        }
    }

    /// Requires one of the given exact roles.
    pub fn any_role(roles: impl Into<Vec<WorkspaceRole>>) -> Self {
        Self {
            roles: roles.into(),
            ..Self::default()
        }
    }

    /// Requires a role at least as privileged as the given one.
    pub fn minimum_role(role: WorkspaceRole) -> Self {
        Self {
            minimum_role: Some(role),
            ..Self::default()
        }
    }

    /// Adds a permission requirement to an existing set.
    pub fn and_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Adds a minimum-role requirement to an existing set.
    pub fn and_minimum_role(mut self, role: WorkspaceRole) -> Self {
        self.minimum_role = Some(role);
        self
    }

    /// Whether anything at all is required.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.roles.is_empty() && self.minimum_role.is_none()
    }
}
