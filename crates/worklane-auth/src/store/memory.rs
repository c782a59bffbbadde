//! In-memory store backends using Tokio mutexes.
//!
//! Suitable for single-node tooling and tests. The token store performs
//! the conditional revoke under one lock, giving the same exactly-one-
//! winner guarantee the SQL `WHERE revoked_at IS NULL` update provides.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use worklane_core::result::AppResult;
use worklane_entity::device::DeviceSession;
use worklane_entity::membership::{Membership, PermissionOverrides};
use worklane_entity::token::RefreshTokenRecord;
use worklane_entity::user::User;
use worklane_entity::workspace::Workspace;

use super::{DeviceSessionStore, DirectoryStore, MembershipStore, TokenStore};

/// In-memory refresh token store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    records: Arc<Mutex<HashMap<Uuid, RefreshTokenRecord>>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn insert(&self, record: &RefreshTokenRecord) -> AppResult<()> {
        self.records
            .lock()
            .await
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn set_token(&self, id: Uuid, token: &str) -> AppResult<()> {
        if let Some(record) = self.records.lock().await.get_mut(&id) {
            record.token = token.to_string();
        }
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshTokenRecord>> {
        if token.is_empty() {
            // Provisional rows all carry an empty string; never match them.
            return Ok(None);
        }
        Ok(self
            .records
            .lock()
            .await
            .values()
            .find(|r| r.token == token)
            .cloned())
    }

    async fn revoke_if_active(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        replaced_by: Option<&str>,
    ) -> AppResult<bool> {
        let mut records = self.records.lock().await;
        match records.get_mut(&id) {
            Some(record) if record.revoked_at.is_none() => {
                record.revoked_at = Some(now);
                record.replaced_by = replaced_by.map(String::from);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<u64> {
        let mut records = self.records.lock().await;
        let mut revoked = 0u64;
        for record in records.values_mut() {
            if record.user_id == user_id && record.revoked_at.is_none() {
                record.revoked_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.records.lock().await.remove(&id).is_some())
    }

    async fn delete_expired_or_revoked(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, r| r.expires_at > now && r.revoked_at.is_none());
        Ok((before - records.len()) as u64)
    }
}

/// In-memory device session store.
#[derive(Debug, Clone, Default)]
pub struct MemoryDeviceSessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, DeviceSession>>>,
}

impl MemoryDeviceSessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeviceSessionStore for MemoryDeviceSessionStore {
    async fn upsert(&self, session: &DeviceSession) -> AppResult<DeviceSession> {
        let mut sessions = self.sessions.lock().await;
        let existing = sessions
            .values_mut()
            .find(|s| s.user_id == session.user_id && s.device_token == session.device_token);

        match existing {
            Some(row) => {
                row.device_type = session.device_type;
                if session.device_name.is_some() {
                    row.device_name = session.device_name.clone();
                }
                if session.user_agent.is_some() {
                    row.user_agent = session.user_agent.clone();
                }
                row.ip_address = session.ip_address.clone();
                if session.location.is_some() {
                    row.location = session.location.clone();
                }
                row.is_active = true;
                row.last_active = session.last_active;
                row.expires_at = session.expires_at;
                Ok(row.clone())
            }
            None => {
                sessions.insert(session.id, session.clone());
                Ok(session.clone())
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DeviceSession>> {
        Ok(self.sessions.lock().await.get(&id).cloned())
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<DeviceSession>> {
        let sessions = self.sessions.lock().await;
        let mut active: Vec<DeviceSession> = sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        Ok(active)
    }

    async fn touch(
        &self,
        user_id: Uuid,
        device_token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        match sessions
            .values_mut()
            .find(|s| s.user_id == user_id && s.device_token == device_token && s.is_active)
        {
            Some(row) => {
                row.last_active = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn deactivate(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(&id) {
            Some(row) if row.user_id == user_id && row.is_active => {
                row.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn deactivate_all(&self, user_id: Uuid) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().await;
        let mut count = 0u64;
        for row in sessions.values_mut() {
            if row.user_id == user_id && row.is_active {
                row.is_active = false;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn deactivate_all_except(&self, user_id: Uuid, device_token: &str) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().await;
        let mut count = 0u64;
        for row in sessions.values_mut() {
            if row.user_id == user_id && row.device_token != device_token && row.is_active {
                row.is_active = false;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}

/// In-memory membership store.
#[derive(Debug, Clone, Default)]
pub struct MemoryMembershipStore {
    memberships: Arc<Mutex<HashMap<(Uuid, Uuid), Membership>>>,
}

impl MemoryMembershipStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn find(&self, user_id: Uuid, workspace_id: Uuid) -> AppResult<Option<Membership>> {
        Ok(self
            .memberships
            .lock()
            .await
            .get(&(user_id, workspace_id))
            .cloned())
    }

    async fn insert(&self, membership: &Membership) -> AppResult<()> {
        self.memberships
            .lock()
            .await
            .insert((membership.user_id, membership.workspace_id), membership.clone());
        Ok(())
    }

    async fn set_overrides(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        overrides: Option<&PermissionOverrides>,
    ) -> AppResult<bool> {
        let mut memberships = self.memberships.lock().await;
        match memberships.get_mut(&(user_id, workspace_id)) {
            Some(row) => {
                row.permissions_override = overrides.cloned();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_active_admins(&self, workspace_id: Uuid) -> AppResult<u64> {
        let memberships = self.memberships.lock().await;
        Ok(memberships
            .values()
            .filter(|m| m.workspace_id == workspace_id && m.role.is_admin() && m.is_active())
            .count() as u64)
    }

    async fn exists(&self, user_id: Uuid, workspace_id: Uuid) -> AppResult<bool> {
        Ok(self
            .memberships
            .lock()
            .await
            .contains_key(&(user_id, workspace_id)))
    }
}

/// In-memory user/workspace directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    workspaces: Arc<Mutex<HashMap<Uuid, Workspace>>>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    pub async fn add_user(&self, user: User) {
        self.users.lock().await.insert(user.id, user);
    }

    /// Registers a workspace.
    pub async fn add_workspace(&self, workspace: Workspace) {
        self.workspaces.lock().await.insert(workspace.id, workspace);
    }

    /// Removes a workspace, simulating deletion by a collaborator.
    pub async fn remove_workspace(&self, id: Uuid) {
        self.workspaces.lock().await.remove(&id);
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectory {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_workspace(&self, id: Uuid) -> AppResult<Option<Workspace>> {
        Ok(self.workspaces.lock().await.get(&id).cloned())
    }
}
