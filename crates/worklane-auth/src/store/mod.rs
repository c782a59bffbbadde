//! Storage traits for the auth core.
//!
//! Every component talks to storage through these traits so the same
//! logic runs against PostgreSQL in production and against the in-memory
//! backends in tests and single-node tooling. Implementations must keep
//! the conditional-revoke semantics atomic: of two racing calls to
//! [`TokenStore::revoke_if_active`] for the same record, exactly one may
//! return `true`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use worklane_core::result::AppResult;
use worklane_entity::device::DeviceSession;
use worklane_entity::membership::{Membership, PermissionOverrides};
use worklane_entity::token::RefreshTokenRecord;
use worklane_entity::user::User;
use worklane_entity::workspace::Workspace;

pub use memory::{MemoryDeviceSessionStore, MemoryDirectory, MemoryMembershipStore, MemoryTokenStore};
pub use postgres::{PgAuthStores, PgDeviceSessionStore, PgDirectory, PgMembershipStore, PgTokenStore};

/// Durable storage for refresh token records.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Insert a new (possibly provisional) record.
    async fn insert(&self, record: &RefreshTokenRecord) -> AppResult<()>;

    /// Write the signed token string into a provisional record.
    async fn set_token(&self, id: Uuid, token: &str) -> AppResult<()>;

    /// Find a record by the literal stored token string.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshTokenRecord>>;

    /// Revoke a record only if not already revoked; `true` when this
    /// call won the update.
    async fn revoke_if_active(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        replaced_by: Option<&str>,
    ) -> AppResult<bool>;

    /// Revoke all non-revoked records for a user. Returns the count.
    async fn revoke_all_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<u64>;

    /// Delete a record. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete all expired or revoked records. Returns the count.
    async fn delete_expired_or_revoked(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Durable storage for device session rows.
#[async_trait]
pub trait DeviceSessionStore: Send + Sync + 'static {
    /// Insert or reactivate the row keyed by `(user_id, device_token)`.
    async fn upsert(&self, session: &DeviceSession) -> AppResult<DeviceSession>;

    /// Find a session by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DeviceSession>>;

    /// List active sessions for a user.
    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<DeviceSession>>;

    /// Update `last_active`. Returns `true` when a row matched.
    async fn touch(&self, user_id: Uuid, device_token: &str, now: DateTime<Utc>)
    -> AppResult<bool>;

    /// Deactivate a session owned by the given user.
    async fn deactivate(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Deactivate every active session for a user. Returns the count.
    async fn deactivate_all(&self, user_id: Uuid) -> AppResult<u64>;

    /// Deactivate every active session except the given device's.
    async fn deactivate_all_except(&self, user_id: Uuid, device_token: &str) -> AppResult<u64>;

    /// Delete expired rows. Returns the count removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Durable storage for workspace memberships.
#[async_trait]
pub trait MembershipStore: Send + Sync + 'static {
    /// Find a membership by its `(user_id, workspace_id)` key.
    async fn find(&self, user_id: Uuid, workspace_id: Uuid) -> AppResult<Option<Membership>>;

    /// Insert a new membership row.
    async fn insert(&self, membership: &Membership) -> AppResult<()>;

    /// Replace the overrides on a membership row; `true` when matched.
    async fn set_overrides(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        overrides: Option<&PermissionOverrides>,
    ) -> AppResult<bool>;

    /// Count active admins in a workspace.
    async fn count_active_admins(&self, workspace_id: Uuid) -> AppResult<u64>;

    /// Whether any membership row (of any status) exists for the key.
    async fn exists(&self, user_id: Uuid, workspace_id: Uuid) -> AppResult<bool>;
}

/// Read-only lookup of users and workspaces owned by collaborators.
#[async_trait]
pub trait DirectoryStore: Send + Sync + 'static {
    /// Find a user by id.
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a workspace by id.
    async fn find_workspace(&self, id: Uuid) -> AppResult<Option<Workspace>>;
}
