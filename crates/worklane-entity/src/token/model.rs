//! Refresh token record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per issued refresh token.
///
/// A non-revoked, non-expired record is redeemable exactly once. When it
/// is rotated, `revoked_at` is set and `replaced_by` points at the new
/// token string, so successive rotations form a singly linked chain from
/// the original login to the most recent still-valid token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshTokenRecord {
    /// Unique record identifier, also embedded in the token's claims.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// The signed refresh token string. Empty while the record is
    /// provisional (created to obtain a stable id before signing).
    pub token: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token expires. The boundary is inclusive: a token whose
    /// `expires_at` equals "now" is already expired.
    pub expires_at: DateTime<Utc>,
    /// When the token was revoked or rotated away (if ever).
    pub revoked_at: Option<DateTime<Utc>>,
    /// The refresh token string that replaced this one on rotation.
    pub replaced_by: Option<String>,
}

impl RefreshTokenRecord {
    /// Builds a provisional record with an empty token string.
    pub fn provisional(user_id: Uuid, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token: String::new(),
            issued_at,
            expires_at,
            revoked_at: None,
            replaced_by: None,
        }
    }

    /// Whether the record has been revoked or rotated away.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Whether the record is expired at the given instant (inclusive).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let record = RefreshTokenRecord::provisional(Uuid::new_v4(), now, now + Duration::days(7));

        assert!(!record.is_expired_at(now));
        assert!(record.is_expired_at(now + Duration::days(7)));
        assert!(record.is_expired_at(now + Duration::days(8)));
    }
}
