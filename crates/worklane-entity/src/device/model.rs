//! Device session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::DeviceType;

/// A tracked, user-visible record of a client connection.
///
/// Uniquely keyed by `(user_id, device_token)`. Device sessions are
/// advisory state: they inform the user and allow self-service
/// revocation, but they never gate authorization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceSession {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Caller-derived device fingerprint. A best-effort identifier, not
    /// a security boundary.
    pub device_token: String,
    /// Broad device class.
    pub device_type: DeviceType,
    /// Human-readable device name.
    pub device_name: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// IP address from which the session was last seen.
    pub ip_address: String,
    /// Coarse geographic location, if resolved.
    pub location: Option<String>,
    /// Whether the session is active (toggled false on revoke).
    pub is_active: bool,
    /// When the session was first created.
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp.
    pub last_active: DateTime<Utc>,
    /// When the session row expires (None = never).
    pub expires_at: Option<DateTime<Utc>>,
}

impl DeviceSession {
    /// Whether the session row has expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Attributes supplied by the caller on login, signup, or refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionAttributes {
    /// Broad device class.
    pub device_type: Option<DeviceType>,
    /// Human-readable device name.
    pub device_name: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Coarse geographic location.
    pub location: Option<String>,
}
