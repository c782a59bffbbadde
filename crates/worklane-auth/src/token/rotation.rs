//! Refresh token rotation — single-use redemption with replay handling.
//!
//! Rotation resolves the presented token against its stored record and
//! gates on stored state, so a structurally valid token can still be
//! rejected. The final gate is a conditional revoke: of two concurrent
//! rotations of the same token, exactly one revokes the parent record
//! and keeps its freshly minted pair; the loser unwinds and fails.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use worklane_core::result::AppResult;
use worklane_core::time::Clock;
use worklane_entity::user::User;

use crate::jwt::{JwtDecoder, TokenPair};
use crate::store::{DirectoryStore, TokenStore};

use super::error::TokenError;
use super::issuer::CredentialIssuer;

/// Rotates and revokes refresh tokens.
#[derive(Clone)]
pub struct RotationAuthority {
    /// Issues the replacement pair during rotation.
    issuer: CredentialIssuer,
    /// JWT decoder for refresh token validation.
    decoder: Arc<JwtDecoder>,
    /// Refresh token persistence.
    tokens: Arc<dyn TokenStore>,
    /// User lookup.
    directory: Arc<dyn DirectoryStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RotationAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationAuthority").finish()
    }
}

impl RotationAuthority {
    /// Creates a new rotation authority.
    pub fn new(
        issuer: CredentialIssuer,
        decoder: Arc<JwtDecoder>,
        tokens: Arc<dyn TokenStore>,
        directory: Arc<dyn DirectoryStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            issuer,
            decoder,
            tokens,
            directory,
            clock,
        }
    }

    /// Redeems a refresh token for a new credential pair, retiring the
    /// presented token.
    pub async fn rotate(&self, refresh_token: &str) -> AppResult<TokenPair> {
        // Gate 1: Signature and claim-level expiry.
        let claims = self.decoder.decode_refresh(refresh_token)?;

        let now = self.clock.now();

        // Gate 2: The token must match a stored record.
        let record = match self.tokens.find_by_token(refresh_token).await? {
            Some(record) => record,
            None => {
                warn!(user_id = %claims.sub, "Refresh token matches no stored record");
                return Err(TokenError::InvalidRefreshToken.into());
            }
        };

        // Gate 3: Claims must agree with the record they resolve to.
        if claims.sub != record.user_id || claims.token_id != record.id {
            warn!(
                user_id = %claims.sub,
                token_id = %record.id,
                "Refresh token claims disagree with stored record"
            );
            return Err(TokenError::InvalidRefreshToken.into());
        }

        // Gate 4: Replay prevention on stored state. A revoked record
        // that carries a replacement means a previously spent token came
        // back; a signature proves nothing once the row is consumed.
        if record.is_revoked() {
            if record.replaced_by.is_some() {
                warn!(
                    user_id = %record.user_id,
                    token_id = %record.id,
                    "Replay of an already-rotated refresh token"
                );
                return Err(TokenError::RefreshTokenReplayed.into());
            }
            return Err(TokenError::RefreshTokenRevoked.into());
        }

        // Gate 5: Record-level expiry (inclusive boundary). The dead row
        // is deleted on sight.
        if record.is_expired_at(now) {
            let _ = self.tokens.delete(record.id).await;
            return Err(TokenError::RefreshTokenExpired.into());
        }

        // Gate 6: The owning user must still exist.
        let user = match self.directory.find_user(record.user_id).await? {
            Some(user) => user,
            None => {
                warn!(user_id = %record.user_id, "Refresh token owner no longer exists");
                return Err(TokenError::UserNotFound.into());
            }
        };

        self.mint_and_swap(&user, record.id, now).await
    }

    /// Mints the replacement pair, then conditionally revokes the parent.
    ///
    /// Mint-first ordering means a crash between the two steps leaves an
    /// extra live token rather than a user locked out; the conditional
    /// revoke is what enforces single use.
    async fn mint_and_swap(
        &self,
        user: &User,
        parent_id: Uuid,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<TokenPair> {
        let (pair, child_id) = self.issuer.issue_with_record(user).await?;

        let won = self
            .tokens
            .revoke_if_active(parent_id, now, Some(&pair.refresh_token))
            .await?;

        if !won {
            // Lost the race to a concurrent rotation. Unwind the child.
            let _ = self.tokens.delete(child_id).await;
            warn!(
                user_id = %user.id,
                token_id = %parent_id,
                "Concurrent rotation lost the revoke race"
            );
            return Err(TokenError::InvalidRefreshToken.into());
        }

        info!(
            user_id = %user.id,
            parent = %parent_id,
            child = %child_id,
            "Refresh token rotated"
        );

        Ok(pair)
    }

    /// Revokes a single refresh token (logout). Unknown or already
    /// revoked tokens are a no-op.
    pub async fn revoke(&self, refresh_token: &str) -> AppResult<bool> {
        let record = match self.tokens.find_by_token(refresh_token).await? {
            Some(record) => record,
            None => return Ok(false),
        };

        let revoked = self
            .tokens
            .revoke_if_active(record.id, self.clock.now(), None)
            .await?;

        if revoked {
            info!(user_id = %record.user_id, token_id = %record.id, "Refresh token revoked");
        }

        Ok(revoked)
    }

    /// Revokes a refresh token by its record id, for callers that hold
    /// the id rather than the token string (admin tooling, audit flows).
    /// Same idempotent semantics as [`Self::revoke`].
    pub async fn revoke_by_id(&self, token_id: Uuid) -> AppResult<bool> {
        let revoked = self
            .tokens
            .revoke_if_active(token_id, self.clock.now(), None)
            .await?;

        if revoked {
            info!(token_id = %token_id, "Refresh token revoked by id");
        }

        Ok(revoked)
    }

    /// Revokes every outstanding refresh token for a user (logout
    /// everywhere, password change, detected compromise).
    pub async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        let revoked = self
            .tokens
            .revoke_all_for_user(user_id, self.clock.now())
            .await?;

        info!(user_id = %user_id, revoked = revoked, "Revoked all refresh tokens for user");

        Ok(revoked)
    }
}
