//! Device session tracking and self-service revocation.
//!
//! Device sessions are advisory: they let a user see and cut loose the
//! devices signed into their account, but authorization never consults
//! them. Losing a row costs visibility, not security.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use worklane_core::config::SessionConfig;
use worklane_core::error::AppError;
use worklane_core::result::AppResult;
use worklane_core::time::Clock;
use worklane_entity::device::{DeviceSession, DeviceType, SessionAttributes};

use crate::store::DeviceSessionStore;

use super::fingerprint::derive_fingerprint;

/// Tracks device sessions across login, refresh, and revocation.
#[derive(Clone)]
pub struct DeviceSessionTracker {
    /// Device session persistence.
    sessions: Arc<dyn DeviceSessionStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Session configuration.
    config: SessionConfig,
}

impl std::fmt::Debug for DeviceSessionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSessionTracker")
            .field("config", &self.config)
            .finish()
    }
}

impl DeviceSessionTracker {
    /// Creates a new device session tracker.
    pub fn new(
        sessions: Arc<dyn DeviceSessionStore>,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        Self {
            sessions,
            clock,
            config,
        }
    }

    /// Records a device sighting on login or signup.
    ///
    /// The row keyed by `(user_id, device_token)` is created or
    /// reactivated; a revoked session on the same device comes back to
    /// life on the next login, which is intended.
    pub async fn upsert_session(
        &self,
        user_id: Uuid,
        device_token: Option<&str>,
        attributes: &SessionAttributes,
    ) -> AppResult<DeviceSession> {
        let now = self.clock.now();
        let token = match device_token {
            Some(token) => token.to_string(),
            None => derive_fingerprint(attributes),
        };

        let session = DeviceSession {
            id: Uuid::new_v4(),
            user_id,
            device_token: token,
            device_type: attributes.device_type.unwrap_or(DeviceType::Web),
            device_name: attributes.device_name.clone(),
            user_agent: attributes.user_agent.clone(),
            ip_address: attributes
                .ip_address
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            location: attributes.location.clone(),
            is_active: true,
            created_at: now,
            last_active: now,
            expires_at: self.expiry_at(now),
        };

        let stored = self.sessions.upsert(&session).await?;

        info!(
            user_id = %user_id,
            session_id = %stored.id,
            device_type = %stored.device_type,
            "Device session recorded"
        );

        Ok(stored)
    }

    /// Bumps `last_active` on a successful token refresh.
    ///
    /// Fire-and-forget: a refresh must never fail because session
    /// bookkeeping did. Errors and misses are logged and swallowed.
    pub async fn update_last_active(&self, user_id: Uuid, device_token: &str) {
        let now = self.clock.now();
        match self.sessions.touch(user_id, device_token, now).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id = %user_id, "No active device session to touch");
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to touch device session");
            }
        }
    }

    /// Lists a user's active sessions, most recently active first.
    pub async fn list_active(&self, user_id: Uuid) -> AppResult<Vec<DeviceSession>> {
        self.sessions.find_active_by_user(user_id).await
    }

    /// Revokes one of the caller's own sessions.
    ///
    /// A session that does not exist and a session owned by someone else
    /// are indistinguishable to the caller: both are not-found.
    pub async fn revoke(&self, session_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let revoked = self.sessions.deactivate(session_id, user_id).await?;
        if !revoked {
            return Err(AppError::not_found("Device session not found"));
        }

        info!(user_id = %user_id, session_id = %session_id, "Device session revoked");
        Ok(())
    }

    /// Revokes every active session for a user. Returns the count.
    pub async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        let revoked = self.sessions.deactivate_all(user_id).await?;
        info!(user_id = %user_id, revoked = revoked, "All device sessions revoked");
        Ok(revoked)
    }

    /// Revokes every active session except the calling device's.
    pub async fn revoke_all_except(&self, user_id: Uuid, device_token: &str) -> AppResult<u64> {
        let revoked = self
            .sessions
            .deactivate_all_except(user_id, device_token)
            .await?;
        info!(user_id = %user_id, revoked = revoked, "Other device sessions revoked");
        Ok(revoked)
    }

    fn expiry_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.config.device_session_ttl().map(|ttl| now + ttl)
    }
}
