//! Leaderboard Model

use serde::{Deserialize, Serialize};

/// One leaderboard row (broadcast payload shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaderboardRow {
    pub name: String,
    pub points: i64,
}
