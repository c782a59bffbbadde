//! Expired device session cleanup.

use std::sync::Arc;

use tracing::{error, info};

use worklane_core::result::AppResult;
use worklane_core::time::Clock;

use crate::store::DeviceSessionStore;

/// Handles periodic cleanup of expired device session rows.
#[derive(Clone)]
pub struct SessionCleanup {
    /// Device session persistence.
    sessions: Arc<dyn DeviceSessionStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SessionCleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCleanup").finish()
    }
}

impl SessionCleanup {
    /// Creates a new session cleanup handler.
    pub fn new(sessions: Arc<dyn DeviceSessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { sessions, clock }
    }

    /// Runs a cleanup cycle. Returns the number of rows removed.
    pub async fn run_cleanup(&self) -> AppResult<u64> {
        let removed = self.sessions.delete_expired(self.clock.now()).await?;

        if removed > 0 {
            info!(removed = removed, "Expired device sessions cleaned up");
        }

        Ok(removed)
    }

    /// Runs cleanup cycles forever at the given period. Intended to be
    /// spawned as a background task.
    pub async fn run_periodic(self, period: std::time::Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if let Err(e) = self.run_cleanup().await {
                error!(error = %e, "Device session cleanup cycle failed");
            }
        }
    }
}
