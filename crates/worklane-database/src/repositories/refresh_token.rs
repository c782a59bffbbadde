//! Refresh token repository implementation.
//!
//! The conditional revoke is the concurrency linchpin: rotation is a
//! read-then-conditional-update sequence, and `WHERE revoked_at IS NULL`
//! guarantees that only one of two racing rotations of the same token
//! wins. The loser observes zero affected rows.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use worklane_core::error::{AppError, ErrorKind};
use worklane_core::result::AppResult;
use worklane_entity::token::RefreshTokenRecord;

/// Repository for refresh token records.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new (possibly provisional) token record.
    pub async fn create(&self, record: &RefreshTokenRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO refresh_tokens (id, user_id, token, issued_at, expires_at, revoked_at, replaced_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.token)
        .bind(record.issued_at)
        .bind(record.expires_at)
        .bind(record.revoked_at)
        .bind(&record.replaced_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create refresh token", e)
        })?;
        Ok(())
    }

    /// Write the signed token string into a provisional record.
    pub async fn set_token(&self, id: Uuid, token: &str) -> AppResult<()> {
        sqlx::query("UPDATE refresh_tokens SET token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to store refresh token", e)
            })?;
        Ok(())
    }

    /// Find a record by the literal stored token string.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshTokenRecord>> {
        sqlx::query_as::<_, RefreshTokenRecord>("SELECT * FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
            })
    }

    /// Find a record by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RefreshTokenRecord>> {
        sqlx::query_as::<_, RefreshTokenRecord>("SELECT * FROM refresh_tokens WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
            })
    }

    /// Revoke a record only if it has not already been revoked.
    ///
    /// Returns `true` when this call performed the revocation.
    pub async fn revoke_if_active(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        replaced_by: Option<&str>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2, replaced_by = $3 \
             WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .bind(now)
        .bind(replaced_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke refresh token", e)
        })?;
        Ok(result.rows_affected() == 1)
    }

    /// Revoke all non-revoked tokens for a user. Returns the count revoked.
    pub async fn revoke_all_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2 \
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user tokens", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Delete a record. Returns `true` if a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete refresh token", e)
            })?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete all expired or revoked rows. Safe to run concurrently.
    pub async fn delete_expired_or_revoked(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM refresh_tokens WHERE expires_at <= $1 OR revoked_at IS NOT NULL",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to reap refresh tokens", e)
        })?;
        Ok(result.rows_affected())
    }
}
