//! Device session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use worklane_core::error::{AppError, ErrorKind};
use worklane_core::result::AppResult;
use worklane_entity::device::DeviceSession;

/// Repository for device session rows.
#[derive(Debug, Clone)]
pub struct DeviceSessionRepository {
    pool: PgPool,
}

impl DeviceSessionRepository {
    /// Create a new device session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update the row keyed by `(user_id, device_token)`.
    ///
    /// An existing row is reactivated and its attributes refreshed; the
    /// unique constraint makes this race-safe.
    pub async fn upsert(&self, session: &DeviceSession) -> AppResult<DeviceSession> {
        sqlx::query_as::<_, DeviceSession>(
            "INSERT INTO device_sessions \
             (id, user_id, device_token, device_type, device_name, user_agent, ip_address, location, is_active, created_at, last_active, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (user_id, device_token) DO UPDATE SET \
                 device_type = EXCLUDED.device_type, \
                 device_name = COALESCE(EXCLUDED.device_name, device_sessions.device_name), \
                 user_agent = COALESCE(EXCLUDED.user_agent, device_sessions.user_agent), \
                 ip_address = EXCLUDED.ip_address, \
                 location = COALESCE(EXCLUDED.location, device_sessions.location), \
                 is_active = TRUE, \
                 last_active = EXCLUDED.last_active, \
                 expires_at = EXCLUDED.expires_at \
             RETURNING *",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.device_token)
        .bind(session.device_type)
        .bind(&session.device_name)
        .bind(&session.user_agent)
        .bind(&session.ip_address)
        .bind(&session.location)
        .bind(session.is_active)
        .bind(session.created_at)
        .bind(session.last_active)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert device session", e)
        })
    }

    /// Find a session by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DeviceSession>> {
        sqlx::query_as::<_, DeviceSession>("SELECT * FROM device_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find device session", e)
            })
    }

    /// List active sessions for a user, most recently active first.
    pub async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<DeviceSession>> {
        sqlx::query_as::<_, DeviceSession>(
            "SELECT * FROM device_sessions WHERE user_id = $1 AND is_active \
             ORDER BY last_active DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list device sessions", e)
        })
    }

    /// Update `last_active` on the row keyed by `(user_id, device_token)`.
    pub async fn touch(
        &self,
        user_id: Uuid,
        device_token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE device_sessions SET last_active = $3 \
             WHERE user_id = $1 AND device_token = $2 AND is_active",
        )
        .bind(user_id)
        .bind(device_token)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to touch device session", e)
        })?;
        Ok(result.rows_affected() == 1)
    }

    /// Deactivate a session owned by the given user.
    ///
    /// Returns `false` when no matching row exists, which callers must
    /// surface as not-found rather than forbidden.
    pub async fn deactivate(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE device_sessions SET is_active = FALSE \
             WHERE id = $1 AND user_id = $2 AND is_active",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke device session", e)
        })?;
        Ok(result.rows_affected() == 1)
    }

    /// Deactivate every active session for a user. Returns the count.
    pub async fn deactivate_all(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE device_sessions SET is_active = FALSE WHERE user_id = $1 AND is_active",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke device sessions", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Deactivate every active session for a user except the given device.
    pub async fn deactivate_all_except(
        &self,
        user_id: Uuid,
        device_token: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE device_sessions SET is_active = FALSE \
             WHERE user_id = $1 AND device_token <> $2 AND is_active",
        )
        .bind(user_id)
        .bind(device_token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke device sessions", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Delete expired session rows. Returns the count removed.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM device_sessions WHERE expires_at IS NOT NULL AND expires_at <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sweep device sessions", e)
        })?;
        Ok(result.rows_affected())
    }
}
