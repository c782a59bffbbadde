//! JWT token validation.
//!
//! Signature and expiry checks only. Refresh tokens additionally pass
//! through stored-state checks in the rotation path; a token that decodes
//! cleanly here may still be rejected there.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;

use worklane_core::config::AuthConfig;
use worklane_core::error::AppError;

use super::claims::{AccessClaims, InvitationClaims, RefreshClaims};

/// Validates access, refresh, and invitation tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC key for access token verification.
    access_key: DecodingKey,
    /// HMAC key for refresh token verification.
    refresh_key: DecodingKey,
    /// HMAC key for invitation token verification.
    invitation_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            access_key: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            invitation_key: DecodingKey::from_secret(config.invitation_token_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access(&self, token: &str) -> Result<AccessClaims, AppError> {
        self.decode_with(token, &self.access_key)
    }

    /// Decodes and validates a refresh token string.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, AppError> {
        self.decode_with(token, &self.refresh_key)
    }

    /// Decodes and validates an invitation token string.
    pub fn decode_invitation(&self, token: &str) -> Result<InvitationClaims, AppError> {
        self.decode_with(token, &self.invitation_key)
    }

    fn decode_with<T: DeserializeOwned>(
        &self,
        token: &str,
        key: &DecodingKey,
    ) -> Result<T, AppError> {
        let token_data = decode::<T>(token, key, &self.validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::unauthorized("Token has expired")
            }
            jsonwebtoken::errors::ErrorKind::InvalidToken => {
                AppError::unauthorized("Invalid token format")
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                AppError::unauthorized("Invalid token signature")
            }
            _ => AppError::unauthorized(format!("Token validation failed: {e}")),
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use worklane_core::config::AuthConfig;
    use worklane_core::time::SystemClock;
    use worklane_entity::membership::WorkspaceRole;

    use super::super::encoder::JwtEncoder;
    use super::*;

    fn pair() -> (JwtEncoder, JwtDecoder) {
        let config = AuthConfig::default();
        let encoder = JwtEncoder::new(&config, Arc::new(SystemClock));
        let decoder = JwtDecoder::new(&config);
        (encoder, decoder)
    }

    #[test]
    fn test_access_round_trip() {
        let (encoder, decoder) = pair();
        let user_id = Uuid::new_v4();

        let (token, _) = encoder.sign_access(user_id, "a@example.com").unwrap();
        let claims = decoder.decode_access(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@example.com");
    }

    #[test]
    fn test_access_tokens_are_unique_within_one_second() {
        let (encoder, _) = pair();
        let user_id = Uuid::new_v4();

        let (a, _) = encoder.sign_access(user_id, "a@example.com").unwrap();
        let (b, _) = encoder.sign_access(user_id, "a@example.com").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_classes_are_not_interchangeable() {
        let (encoder, decoder) = pair();
        let now = Utc::now();

        let refresh = encoder
            .sign_refresh(
                Uuid::new_v4(),
                "a@example.com",
                Uuid::new_v4(),
                now,
                now + chrono::Duration::days(7),
            )
            .unwrap();

        assert!(decoder.decode_access(&refresh).is_err());
        assert!(decoder.decode_invitation(&refresh).is_err());
        assert!(decoder.decode_refresh(&refresh).is_ok());
    }

    #[test]
    fn test_invitation_round_trip() {
        let (encoder, decoder) = pair();
        let workspace_id = Uuid::new_v4();
        let invited_by = Uuid::new_v4();

        let (token, _) = encoder
            .sign_invitation("new@example.com", workspace_id, invited_by, WorkspaceRole::Member)
            .unwrap();
        let claims = decoder.decode_invitation(&token).unwrap();

        assert_eq!(claims.email, "new@example.com");
        assert_eq!(claims.workspace_id, workspace_id);
        assert_eq!(claims.invited_by, invited_by);
        assert_eq!(claims.role, WorkspaceRole::Member);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let (_, decoder) = pair();
        assert!(decoder.decode_access("not.a.jwt").is_err());
    }
}
