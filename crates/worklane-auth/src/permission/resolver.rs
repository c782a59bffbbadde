//! Effective permission resolution — role defaults plus per-member
//! overrides.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use worklane_core::error::AppError;
use worklane_core::result::AppResult;
use worklane_entity::membership::{PermissionOverrides, WorkspaceRole};
use worklane_entity::permission::Permission;

use crate::store::MembershipStore;

use super::policies::RolePolicies;

/// A member's fully resolved permission state within one workspace.
#[derive(Debug, Clone)]
pub struct ResolvedPermissions {
    /// The member's role.
    pub role: WorkspaceRole,
    /// Effective permission set after overrides.
    pub permissions: HashSet<Permission>,
    /// Whether any overrides contributed to the set.
    pub has_overrides: bool,
}

impl ResolvedPermissions {
    /// Whether the effective set contains the permission.
    pub fn contains(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Resolves effective permissions for workspace members.
///
/// Resolution order is fixed: start from the role's default set, add the
/// override grants, then subtract the override revocations. Revocation
/// always wins, including over an explicit grant of the same permission.
#[derive(Clone)]
pub struct PermissionResolver {
    /// Membership persistence.
    memberships: Arc<dyn MembershipStore>,
    /// Role default policies.
    policies: RolePolicies,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}

impl PermissionResolver {
    /// Creates a resolver with the default policy set.
    pub fn new(memberships: Arc<dyn MembershipStore>) -> Self {
        Self {
            memberships,
            policies: RolePolicies::new(),
        }
    }

    /// Creates a resolver with custom policies.
    pub fn with_policies(memberships: Arc<dyn MembershipStore>, policies: RolePolicies) -> Self {
        Self {
            memberships,
            policies,
        }
    }

    /// Resolves the effective permissions a user holds in a workspace.
    ///
    /// `None` means the user has no active membership there: absent,
    /// pending, and suspended memberships all resolve identically.
    pub async fn get_user_permissions(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
    ) -> AppResult<Option<ResolvedPermissions>> {
        let membership = match self.memberships.find(user_id, workspace_id).await? {
            Some(m) if m.is_active() => m,
            _ => return Ok(None),
        };

        let mut permissions = self.policies.permissions_for_role(membership.role);

        let has_overrides = membership.has_overrides();
        if let Some(overrides) = &membership.permissions_override {
            for perm in &overrides.granted {
                permissions.insert(*perm);
            }
            // Revocation wins over both defaults and grants.
            for perm in &overrides.revoked {
                permissions.remove(perm);
            }
        }

        Ok(Some(ResolvedPermissions {
            role: membership.role,
            permissions,
            has_overrides,
        }))
    }

    /// Whether the user holds the given permission in the workspace.
    pub async fn has_permission(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        permission: Permission,
    ) -> AppResult<bool> {
        Ok(self
            .get_user_permissions(user_id, workspace_id)
            .await?
            .is_some_and(|resolved| resolved.contains(permission)))
    }

    /// Whether the user holds at least one of the given permissions.
    pub async fn has_any_permission(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        permissions: &[Permission],
    ) -> AppResult<bool> {
        Ok(self
            .get_user_permissions(user_id, workspace_id)
            .await?
            .is_some_and(|resolved| permissions.iter().any(|p| resolved.contains(*p))))
    }

    /// Whether the user holds every one of the given permissions.
    pub async fn has_all_permissions(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        permissions: &[Permission],
    ) -> AppResult<bool> {
        Ok(self
            .get_user_permissions(user_id, workspace_id)
            .await?
            .is_some_and(|resolved| permissions.iter().all(|p| resolved.contains(*p))))
    }

    /// The user's role in the workspace, if actively a member.
    pub async fn get_user_role(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
    ) -> AppResult<Option<WorkspaceRole>> {
        let membership = self.memberships.find(user_id, workspace_id).await?;
        Ok(membership.filter(|m| m.is_active()).map(|m| m.role))
    }

    /// Whether the user holds exactly the given role.
    pub async fn has_role(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        role: WorkspaceRole,
    ) -> AppResult<bool> {
        Ok(self.get_user_role(user_id, workspace_id).await? == Some(role))
    }

    /// Whether the user holds one of the given roles.
    pub async fn has_any_role(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        roles: &[WorkspaceRole],
    ) -> AppResult<bool> {
        Ok(self
            .get_user_role(user_id, workspace_id)
            .await?
            .is_some_and(|role| roles.contains(&role)))
    }

    /// Whether the user's role is at least as privileged as `minimum`.
    pub async fn has_minimum_role(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        minimum: WorkspaceRole,
    ) -> AppResult<bool> {
        Ok(self
            .get_user_role(user_id, workspace_id)
            .await?
            .is_some_and(|role| role.has_at_least(minimum)))
    }

    /// Counts active admins in a workspace. Exposed for the
    /// last-admin-standing invariant on role mutations.
    pub async fn count_active_admins(&self, workspace_id: Uuid) -> AppResult<u64> {
        self.memberships.count_active_admins(workspace_id).await
    }

    /// Replaces the permission overrides on a target member.
    ///
    /// The actor must hold `member:update_members` in the workspace and
    /// may not target their own membership. Empty overrides are
    /// normalized to no overrides.
    pub async fn update_overrides(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        workspace_id: Uuid,
        overrides: PermissionOverrides,
    ) -> AppResult<()> {
        if actor_id == target_id {
            return Err(AppError::forbidden(
                "Cannot modify your own permission overrides",
            ));
        }

        if !self
            .has_permission(actor_id, workspace_id, Permission::UpdateMembers)
            .await?
        {
            return Err(AppError::forbidden(
                "Missing permission to update member permissions",
            ));
        }

        let normalized = if overrides.is_empty() {
            None
        } else {
            Some(&overrides)
        };

        let updated = self
            .memberships
            .set_overrides(target_id, workspace_id, normalized)
            .await?;

        if !updated {
            return Err(AppError::not_found("Membership not found"));
        }

        info!(
            actor_id = %actor_id,
            target_id = %target_id,
            workspace_id = %workspace_id,
            granted = overrides.granted.len(),
            revoked = overrides.revoked.len(),
            "Permission overrides updated"
        );

        Ok(())
    }

    /// Removes all permission overrides from a target member, restoring
    /// their role defaults. Same gating as [`Self::update_overrides`].
    pub async fn clear_overrides(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        workspace_id: Uuid,
    ) -> AppResult<()> {
        self.update_overrides(actor_id, target_id, workspace_id, PermissionOverrides::default())
            .await
    }
}
