//! Leaderboard Module
//!
//! Periodic ranked snapshot of top users by derived total, broadcast to
//! realtime subscribers.

use crate::db::repository::{RepoResult, ledger};
use crate::realtime::Realtime;
use sqlx::SqlitePool;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Snapshot length cap
pub const LEADERBOARD_SIZE: i64 = 10;

/// Current top-N snapshot: every user's derived total, descending, ties
/// broken by user id, truncated to [`LEADERBOARD_SIZE`].
pub async fn snapshot(pool: &SqlitePool) -> RepoResult<Vec<shared::models::LeaderboardRow>> {
    ledger::top_totals(pool, LEADERBOARD_SIZE).await
}

/// Publishes the snapshot on a fixed interval for the process lifetime.
pub struct LeaderboardWorker {
    pool: SqlitePool,
    realtime: Realtime,
}

impl LeaderboardWorker {
    pub fn new(pool: SqlitePool, realtime: Realtime) -> Self {
        Self { pool, realtime }
    }

    pub async fn run(self, interval: Duration, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = interval.as_secs(),
            "Leaderboard publisher started"
        );
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Leaderboard publisher stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match snapshot(&self.pool).await {
                        Ok(board) => self.realtime.leaderboard(&board).await,
                        Err(e) => {
                            // Store hiccup: publish nothing this tick, try again next
                            tracing::warn!(error = %e, "Failed to compute leaderboard snapshot");
                        }
                    }
                }
            }
        }
    }
}
