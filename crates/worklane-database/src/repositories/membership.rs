//! Membership repository implementation.

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use worklane_core::error::{AppError, ErrorKind};
use worklane_core::result::AppResult;
use worklane_entity::membership::{Membership, PermissionOverrides};

/// Repository for workspace membership rows.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a membership by its `(user_id, workspace_id)` key.
    pub async fn find_by_user_and_workspace(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
    ) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE user_id = $1 AND workspace_id = $2",
        )
        .bind(user_id)
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    /// Insert a new membership row.
    pub async fn create(&self, membership: &Membership) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO memberships \
             (id, user_id, workspace_id, role, status, permissions_override, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(membership.id)
        .bind(membership.user_id)
        .bind(membership.workspace_id)
        .bind(membership.role)
        .bind(membership.status)
        .bind(membership.permissions_override.as_ref().map(Json))
        .bind(membership.created_at)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create membership", e)
        })?;
        Ok(())
    }

    /// Replace the permission overrides on a membership row.
    ///
    /// Returns `true` when a matching row was updated.
    pub async fn set_overrides(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        overrides: Option<&PermissionOverrides>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE memberships SET permissions_override = $3, updated_at = NOW() \
             WHERE user_id = $1 AND workspace_id = $2",
        )
        .bind(user_id)
        .bind(workspace_id)
        .bind(overrides.map(Json))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update overrides", e)
        })?;
        Ok(result.rows_affected() == 1)
    }

    /// Count active admins in a workspace.
    ///
    /// Exposed so the collaborator that mutates roles can enforce the
    /// one-active-admin-minimum invariant.
    pub async fn count_active_admins(&self, workspace_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM memberships \
             WHERE workspace_id = $1 AND role = 'admin' AND status = 'active'",
        )
        .bind(workspace_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count admins", e))?;
        Ok(count as u64)
    }

    /// Whether any membership row (of any status) exists for the key.
    pub async fn exists(&self, user_id: Uuid, workspace_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM memberships WHERE user_id = $1 AND workspace_id = $2",
        )
        .bind(user_id)
        .bind(workspace_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check membership", e)
        })?;
        Ok(count > 0)
    }
}
