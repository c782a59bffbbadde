//! Device session configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Device session tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a device session row stays valid without renewal, in days.
    /// `0` disables expiry (rows live until revoked or swept).
    #[serde(default = "default_session_ttl")]
    pub device_session_ttl_days: u64,
    /// Interval for expired session cleanup sweeps, in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl SessionConfig {
    /// Device session lifetime, or `None` when expiry is disabled.
    pub fn device_session_ttl(&self) -> Option<Duration> {
        if self.device_session_ttl_days == 0 {
            None
        } else {
            Some(Duration::days(self.device_session_ttl_days as i64))
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            device_session_ttl_days: default_session_ttl(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_session_ttl() -> u64 {
    30
}

fn default_cleanup_interval() -> u64 {
    60
}
