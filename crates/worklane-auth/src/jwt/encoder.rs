//! JWT token creation with per-class signing keys and configurable TTLs.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use worklane_core::config::AuthConfig;
use worklane_core::error::AppError;
use worklane_core::time::Clock;
use worklane_entity::membership::WorkspaceRole;

use super::claims::{AccessClaims, InvitationClaims, RefreshClaims};

/// Creates signed access, refresh, and invitation tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC key for access token signing.
    access_key: EncodingKey,
    /// HMAC key for refresh token signing.
    refresh_key: EncodingKey,
    /// HMAC key for invitation token signing.
    invitation_key: EncodingKey,
    /// Access token lifetime.
    access_ttl: Duration,
    /// Refresh token lifetime.
    refresh_ttl: Duration,
    /// Invitation token lifetime.
    invitation_ttl: Duration,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("invitation_ttl", &self.invitation_ttl)
            .finish()
    }
}

/// Result of a successful credential issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            invitation_key: EncodingKey::from_secret(config.invitation_token_secret.as_bytes()),
            access_ttl: config.access_ttl(),
            refresh_ttl: config.refresh_ttl(),
            invitation_ttl: config.invitation_ttl(),
            clock,
        }
    }

    /// Refresh token lifetime, exposed so record expiry can be computed
    /// before signing.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Generates a standalone access token.
    pub fn sign_access(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = self.clock.now();
        let exp = now + self.access_ttl;

        let claims = AccessClaims {
            sub: user_id,
            email: email.to_string(),
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.access_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, exp))
    }

    /// Generates a refresh token bound to an existing record.
    ///
    /// The timestamps are supplied by the caller so the claims match the
    /// record row exactly.
    pub fn sign_refresh(
        &self,
        user_id: Uuid,
        email: &str,
        token_id: Uuid,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = RefreshClaims {
            sub: user_id,
            email: email.to_string(),
            token_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::default(), &claims, &self.refresh_key)
            .map_err(|e| AppError::internal(format!("Failed to encode refresh token: {e}")))
    }

    /// Generates a self-contained workspace invitation token.
    pub fn sign_invitation(
        &self,
        email: &str,
        workspace_id: Uuid,
        invited_by: Uuid,
        role: WorkspaceRole,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = self.clock.now();
        let exp = now + self.invitation_ttl;

        let claims = InvitationClaims {
            email: email.to_string(),
            workspace_id,
            invited_by,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.invitation_key)
            .map_err(|e| AppError::internal(format!("Failed to encode invitation token: {e}")))?;

        Ok((token, exp))
    }
}
