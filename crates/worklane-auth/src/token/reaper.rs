//! Periodic removal of dead refresh token rows.

use std::sync::Arc;

use tracing::{error, info};

use worklane_core::result::AppResult;
use worklane_core::time::Clock;

use crate::store::TokenStore;

/// Deletes expired and revoked refresh token rows.
///
/// Dead rows are already unredeemable; reaping only bounds table growth.
/// Safe to run concurrently with rotation.
#[derive(Clone)]
pub struct TokenReaper {
    /// Refresh token persistence.
    tokens: Arc<dyn TokenStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenReaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenReaper").finish()
    }
}

impl TokenReaper {
    /// Creates a new token reaper.
    pub fn new(tokens: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        Self { tokens, clock }
    }

    /// Runs one reaping cycle. Returns the number of rows removed.
    pub async fn reap(&self) -> AppResult<u64> {
        let removed = self
            .tokens
            .delete_expired_or_revoked(self.clock.now())
            .await?;

        if removed > 0 {
            info!(removed = removed, "Reaped dead refresh token rows");
        }

        Ok(removed)
    }

    /// Runs reaping cycles forever at the given period. Intended to be
    /// spawned as a background task.
    pub async fn run_periodic(self, period: std::time::Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if let Err(e) = self.reap().await {
                error!(error = %e, "Refresh token reaping cycle failed");
            }
        }
    }
}
