//! Authentication and token configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
///
/// Three distinct signing secrets are used so that leaking one token
/// class does not compromise the others: access tokens, refresh tokens,
/// and invitation tokens each get their own key.
///
/// All TTLs are numeric and converted into [`chrono::Duration`] once via
/// the accessor methods; no duration strings are parsed at request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for access token signing (HMAC-SHA256).
    #[serde(default = "default_access_secret")]
    pub access_token_secret: String,
    /// Secret key for refresh token signing (HMAC-SHA256).
    #[serde(default = "default_refresh_secret")]
    pub refresh_token_secret: String,
    /// Secret key for workspace invitation token signing (HMAC-SHA256).
    #[serde(default = "default_invitation_secret")]
    pub invitation_token_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Invitation token TTL in days.
    #[serde(default = "default_invitation_ttl")]
    pub invitation_ttl_days: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl AuthConfig {
    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.access_ttl_minutes as i64)
    }

    /// Refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(self.refresh_ttl_days as i64)
    }

    /// Invitation token lifetime.
    pub fn invitation_ttl(&self) -> Duration {
        Duration::days(self.invitation_ttl_days as i64)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: default_access_secret(),
            refresh_token_secret: default_refresh_secret(),
            invitation_token_secret: default_invitation_secret(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            invitation_ttl_days: default_invitation_ttl(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_invitation_secret() -> String {
    "CHANGE_ME_INVITATION_SECRET".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_invitation_ttl() -> u64 {
    7
}

fn default_password_min() -> usize {
    8
}
