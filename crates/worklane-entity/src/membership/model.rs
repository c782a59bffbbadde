//! Membership entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::overrides::PermissionOverrides;
use super::role::WorkspaceRole;
use super::status::MembershipStatus;

/// A user's membership in a workspace.
///
/// Uniquely keyed by `(user_id, workspace_id)`; the database enforces
/// this with a unique constraint, which is load-bearing for correctness.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    /// Unique membership identifier.
    pub id: Uuid,
    /// The member.
    pub user_id: Uuid,
    /// The workspace the membership belongs to.
    pub workspace_id: Uuid,
    /// Role within the workspace.
    pub role: WorkspaceRole,
    /// Membership lifecycle status.
    pub status: MembershipStatus,
    /// Optional per-member permission overrides (JSONB).
    #[sqlx(json(nullable))]
    pub permissions_override: Option<PermissionOverrides>,
    /// When the membership was created.
    pub created_at: DateTime<Utc>,
    /// When the membership was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// Builds a new active membership with no overrides.
    pub fn new_active(user_id: Uuid, workspace_id: Uuid, role: WorkspaceRole, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            workspace_id,
            role,
            status: MembershipStatus::Active,
            permissions_override: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether access checks should consider this membership at all.
    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }

    /// Whether any overrides are present.
    pub fn has_overrides(&self) -> bool {
        self.permissions_override
            .as_ref()
            .is_some_and(|o| !o.is_empty())
    }
}
