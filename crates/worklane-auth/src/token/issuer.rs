//! Credential issuance.
//!
//! Refresh tokens are persisted through a two-phase write: a provisional
//! row with an empty token string reserves a stable id, the token is
//! signed with that id in its claims, then the signed string is written
//! back. The store never matches empty token strings, so a provisional
//! row is unredeemable.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use worklane_core::result::AppResult;
use worklane_core::time::Clock;
use worklane_entity::token::RefreshTokenRecord;
use worklane_entity::user::User;

use crate::jwt::{JwtEncoder, TokenPair};
use crate::store::TokenStore;

/// Issues fresh access + refresh credential pairs.
#[derive(Clone)]
pub struct CredentialIssuer {
    /// JWT encoder for token signing.
    encoder: Arc<JwtEncoder>,
    /// Refresh token persistence.
    tokens: Arc<dyn TokenStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CredentialIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialIssuer").finish()
    }
}

impl CredentialIssuer {
    /// Creates a new credential issuer.
    pub fn new(encoder: Arc<JwtEncoder>, tokens: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoder,
            tokens,
            clock,
        }
    }

    /// Issues a new token pair for an authenticated user.
    pub async fn issue(&self, user: &User) -> AppResult<TokenPair> {
        let (pair, _) = self.issue_with_record(user).await?;
        Ok(pair)
    }

    /// Issues a new token pair and returns the id of the refresh record,
    /// so rotation can unwind the child if it loses the revoke race.
    pub(crate) async fn issue_with_record(&self, user: &User) -> AppResult<(TokenPair, Uuid)> {
        let now = self.clock.now();
        let refresh_expires_at = now + self.encoder.refresh_ttl();

        // Step 1: Access token. Signed first so nothing is persisted if
        // signing fails.
        let (access_token, access_expires_at) = self.encoder.sign_access(user.id, &user.email)?;

        // Step 2: Provisional record, empty token string.
        let record = RefreshTokenRecord::provisional(user.id, now, refresh_expires_at);
        self.tokens.insert(&record).await?;

        // Step 3: Sign the refresh token with the record id in its claims.
        let refresh_token = match self.encoder.sign_refresh(
            user.id,
            &user.email,
            record.id,
            now,
            refresh_expires_at,
        ) {
            Ok(token) => token,
            Err(e) => {
                // Unredeemable either way, but don't leave the row behind.
                let _ = self.tokens.delete(record.id).await;
                return Err(e);
            }
        };

        // Step 4: Write the signed string back.
        self.tokens.set_token(record.id, &refresh_token).await?;

        info!(user_id = %user.id, token_id = %record.id, "Issued credential pair");

        Ok((
            TokenPair {
                access_token,
                refresh_token,
                access_expires_at,
                refresh_expires_at,
            },
            record.id,
        ))
    }
}
