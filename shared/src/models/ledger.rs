//! Points Ledger Model
//!
//! 积分流水：只追加、不可变。用户总分永远是流水增量之和，不缓存。

use serde::{Deserialize, Serialize};

/// One immutable accrual record.
///
/// Never updated or deleted — a correction is a new entry with an
/// offsetting delta. `engagement_id` is NULL for manual/administrative
/// adjustments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: i64,
    pub engagement_id: Option<i64>,
    pub points_delta: i64,
    pub reason: String,
    pub timestamp: i64,
}

/// Manual adjustment payload (admin surface)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsAdjust {
    pub delta: i64,
    pub reason: String,
}

/// Realtime notification emitted after an account is reconciled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsUpdate {
    pub user_id: i64,
    pub total: i64,
}
