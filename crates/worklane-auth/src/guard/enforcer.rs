//! Request-time evaluation of access requirements.

use tracing::warn;
use uuid::Uuid;

use worklane_core::error::AppError;
use worklane_core::result::AppResult;

use crate::permission::{PermissionResolver, ResolvedPermissions};

use super::requirements::AccessRequirements;

/// Evaluates [`AccessRequirements`] against a user's resolved state.
///
/// Permission checks run against the effective set, so a member with a
/// granted override passes a permission requirement their role alone
/// would fail. Role checks ignore overrides entirely.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    /// Permission resolution.
    resolver: PermissionResolver,
}

impl AccessGuard {
    /// Creates a new access guard.
    pub fn new(resolver: PermissionResolver) -> Self {
        Self { resolver }
    }

    /// Checks the requirements for a user against a workspace.
    ///
    /// Returns `Ok(())` when every requirement category passes. Failures
    /// are all forbidden; membership state never leaks through the error.
    pub async fn check(
        &self,
        user_id: Uuid,
        workspace_id: Option<Uuid>,
        requirements: &AccessRequirements,
    ) -> AppResult<()> {
        if requirements.is_empty() {
            return Ok(());
        }

        // A missing workspace id is a malformed request, not a denial.
        let workspace_id = workspace_id
            .ok_or_else(|| AppError::validation("Operation requires a workspace id"))?;

        let resolved = self
            .resolver
            .get_user_permissions(user_id, workspace_id)
            .await?
            .ok_or_else(|| {
                warn!(
                    user_id = %user_id,
                    workspace_id = %workspace_id,
                    "Access denied: no active membership"
                );
                AppError::forbidden("Not an active member of this workspace")
            })?;

        self.check_permissions(user_id, workspace_id, &resolved, requirements)?;
        self.check_roles(user_id, workspace_id, &resolved, requirements)?;

        Ok(())
    }

    fn check_permissions(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        resolved: &ResolvedPermissions,
        requirements: &AccessRequirements,
    ) -> AppResult<()> {
        if requirements.permissions.is_empty() {
            return Ok(());
        }

        let passed = if requirements.require_all {
            requirements
                .permissions
                .iter()
                .all(|p| resolved.contains(*p))
        } else {
            requirements
                .permissions
                .iter()
                .any(|p| resolved.contains(*p))
        };

        if passed {
            Ok(())
        } else {
            // The missing requirement stays in server-side logs; the
            // caller only sees a generic denial.
            warn!(
                user_id = %user_id,
                workspace_id = %workspace_id,
                required = ?requirements.permissions,
                require_all = requirements.require_all,
                "Access denied: permission check failed"
            );
            Err(AppError::forbidden("Insufficient permissions"))
        }
    }

    fn check_roles(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        resolved: &ResolvedPermissions,
        requirements: &AccessRequirements,
    ) -> AppResult<()> {
        if !requirements.roles.is_empty() && !requirements.roles.contains(&resolved.role) {
            warn!(
                user_id = %user_id,
                workspace_id = %workspace_id,
                role = %resolved.role,
                required = ?requirements.roles,
                "Access denied: role not in the permitted set"
            );
            return Err(AppError::forbidden("Role not permitted for this operation"));
        }

        if let Some(minimum) = requirements.minimum_role {
            if !resolved.role.has_at_least(minimum) {
                warn!(
                    user_id = %user_id,
                    workspace_id = %workspace_id,
                    role = %resolved.role,
                    minimum = %minimum,
                    "Access denied: role below required minimum"
                );
                return Err(AppError::forbidden("Insufficient role for this operation"));
            }
        }

        Ok(())
    }
}
