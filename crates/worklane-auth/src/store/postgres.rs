//! PostgreSQL store backends.
//!
//! Thin adapters over the repository layer; all SQL lives in
//! `worklane-database`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use worklane_core::result::AppResult;
use worklane_database::Database;
use worklane_database::repositories::{
    DeviceSessionRepository, MembershipRepository, RefreshTokenRepository, UserRepository,
    WorkspaceRepository,
};
use worklane_entity::device::DeviceSession;
use worklane_entity::membership::{Membership, PermissionOverrides};
use worklane_entity::token::RefreshTokenRecord;
use worklane_entity::user::User;
use worklane_entity::workspace::Workspace;

use super::{DeviceSessionStore, DirectoryStore, MembershipStore, TokenStore};

/// The full set of Postgres-backed stores over one shared pool.
#[derive(Debug, Clone)]
pub struct PgAuthStores {
    /// Refresh token persistence.
    pub tokens: Arc<PgTokenStore>,
    /// Device session persistence.
    pub sessions: Arc<PgDeviceSessionStore>,
    /// Membership persistence.
    pub memberships: Arc<PgMembershipStore>,
    /// User and workspace lookup.
    pub directory: Arc<PgDirectory>,
}

impl PgAuthStores {
    /// Builds every store backend over a connected database.
    pub fn new(database: &Database) -> Self {
        let pool = database.pool().clone();
        Self {
            tokens: Arc::new(PgTokenStore::new(pool.clone())),
            sessions: Arc::new(PgDeviceSessionStore::new(pool.clone())),
            memberships: Arc::new(PgMembershipStore::new(pool.clone())),
            directory: Arc::new(PgDirectory::new(pool)),
        }
    }
}

/// Postgres-backed refresh token store.
#[derive(Debug, Clone)]
pub struct PgTokenStore {
    repo: RefreshTokenRepository,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: RefreshTokenRepository::new(pool),
        }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn insert(&self, record: &RefreshTokenRecord) -> AppResult<()> {
        self.repo.create(record).await
    }

    async fn set_token(&self, id: Uuid, token: &str) -> AppResult<()> {
        self.repo.set_token(id, token).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshTokenRecord>> {
        if token.is_empty() {
            return Ok(None);
        }
        self.repo.find_by_token(token).await
    }

    async fn revoke_if_active(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        replaced_by: Option<&str>,
    ) -> AppResult<bool> {
        self.repo.revoke_if_active(id, now, replaced_by).await
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<u64> {
        self.repo.revoke_all_for_user(user_id, now).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.repo.delete(id).await
    }

    async fn delete_expired_or_revoked(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.repo.delete_expired_or_revoked(now).await
    }
}

/// Postgres-backed device session store.
#[derive(Debug, Clone)]
pub struct PgDeviceSessionStore {
    repo: DeviceSessionRepository,
}

impl PgDeviceSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: DeviceSessionRepository::new(pool),
        }
    }
}

#[async_trait]
impl DeviceSessionStore for PgDeviceSessionStore {
    async fn upsert(&self, session: &DeviceSession) -> AppResult<DeviceSession> {
        self.repo.upsert(session).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DeviceSession>> {
        self.repo.find_by_id(id).await
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<DeviceSession>> {
        self.repo.find_active_by_user(user_id).await
    }

    async fn touch(
        &self,
        user_id: Uuid,
        device_token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.repo.touch(user_id, device_token, now).await
    }

    async fn deactivate(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        self.repo.deactivate(id, user_id).await
    }

    async fn deactivate_all(&self, user_id: Uuid) -> AppResult<u64> {
        self.repo.deactivate_all(user_id).await
    }

    async fn deactivate_all_except(&self, user_id: Uuid, device_token: &str) -> AppResult<u64> {
        self.repo.deactivate_all_except(user_id, device_token).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.repo.delete_expired(now).await
    }
}

/// Postgres-backed membership store.
#[derive(Debug, Clone)]
pub struct PgMembershipStore {
    repo: MembershipRepository,
}

impl PgMembershipStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: MembershipRepository::new(pool),
        }
    }
}

#[async_trait]
impl MembershipStore for PgMembershipStore {
    async fn find(&self, user_id: Uuid, workspace_id: Uuid) -> AppResult<Option<Membership>> {
        self.repo.find_by_user_and_workspace(user_id, workspace_id).await
    }

    async fn insert(&self, membership: &Membership) -> AppResult<()> {
        self.repo.create(membership).await
    }

    async fn set_overrides(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        overrides: Option<&PermissionOverrides>,
    ) -> AppResult<bool> {
        self.repo.set_overrides(user_id, workspace_id, overrides).await
    }

    async fn count_active_admins(&self, workspace_id: Uuid) -> AppResult<u64> {
        self.repo.count_active_admins(workspace_id).await
    }

    async fn exists(&self, user_id: Uuid, workspace_id: Uuid) -> AppResult<bool> {
        self.repo.exists(user_id, workspace_id).await
    }
}

/// Postgres-backed user/workspace directory.
#[derive(Debug, Clone)]
pub struct PgDirectory {
    users: UserRepository,
    workspaces: WorkspaceRepository,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            workspaces: WorkspaceRepository::new(pool),
        }
    }
}

#[async_trait]
impl DirectoryStore for PgDirectory {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.find_by_email(email).await
    }

    async fn find_workspace(&self, id: Uuid) -> AppResult<Option<Workspace>> {
        self.workspaces.find_by_id(id).await
    }
}
