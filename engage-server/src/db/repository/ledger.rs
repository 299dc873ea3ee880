//! Points Ledger Repository
//!
//! Append-only: this module exposes insert and aggregation queries, nothing
//! else. There is deliberately no update or delete.

use super::{RepoError, RepoResult};
use shared::models::{LeaderboardRow, LedgerEntry};
use sqlx::SqlitePool;

const LEDGER_SELECT: &str =
    "SELECT id, user_id, engagement_id, points_delta, reason, timestamp FROM points_ledger";

/// Append one immutable ledger row.
pub async fn insert(
    pool: &SqlitePool,
    user_id: i64,
    engagement_id: Option<i64>,
    points_delta: i64,
    reason: &str,
) -> RepoResult<LedgerEntry> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO points_ledger (id, user_id, engagement_id, points_delta, reason, timestamp) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(user_id)
    .bind(engagement_id)
    .bind(points_delta)
    .bind(reason)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create ledger entry".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LedgerEntry>> {
    let sql = format!("{LEDGER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, LedgerEntry>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<LedgerEntry>> {
    let sql = format!("{LEDGER_SELECT} WHERE user_id = ? ORDER BY timestamp, id");
    let rows = sqlx::query_as::<_, LedgerEntry>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Derived total: sum of all deltas for the user, 0 when no rows exist.
/// Never a cached column — aggregation is the source of truth.
pub async fn total_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<i64> {
    let (total,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(points_delta), 0) FROM points_ledger WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Top-N users by derived total, descending, ties broken by user id.
/// Users without ledger rows rank with total 0.
pub async fn top_totals(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<LeaderboardRow>> {
    let rows = sqlx::query_as::<_, LeaderboardRow>(
        "SELECT u.username AS name, COALESCE(SUM(l.points_delta), 0) AS points \
         FROM user u LEFT JOIN points_ledger l ON l.user_id = u.id \
         GROUP BY u.id ORDER BY points DESC, u.id LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{test_support::test_pool, user};

    #[tokio::test]
    async fn total_is_zero_for_unknown_user() {
        let pool = test_pool().await;
        assert_eq!(total_for_user(&pool, 999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn totals_sum_signed_deltas() {
        let pool = test_pool().await;
        let u = user::upsert_by_username(&pool, "alice").await.unwrap();
        insert(&pool, u.id, None, 5, "COMMENT").await.unwrap();
        insert(&pool, u.id, None, 2, "LIKE").await.unwrap();
        insert(&pool, u.id, None, -3, "correction").await.unwrap();
        assert_eq!(total_for_user(&pool, u.id).await.unwrap(), 4);
        assert_eq!(find_by_user(&pool, u.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn find_by_user_returns_insertion_order() {
        let pool = test_pool().await;
        let u = user::upsert_by_username(&pool, "alice").await.unwrap();
        // Back-to-back inserts land in the same millisecond; the id
        // tiebreaker must still reproduce insertion order.
        for delta in 0..40 {
            insert(&pool, u.id, None, delta, "COMMENT").await.unwrap();
        }
        let rows = find_by_user(&pool, u.id).await.unwrap();
        let deltas: Vec<i64> = rows.iter().map(|r| r.points_delta).collect();
        assert_eq!(deltas, (0..40).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn top_totals_orders_and_limits() {
        let pool = test_pool().await;
        let a = user::upsert_by_username(&pool, "alice").await.unwrap();
        let b = user::upsert_by_username(&pool, "bob").await.unwrap();
        user::upsert_by_username(&pool, "carol").await.unwrap();
        insert(&pool, a.id, None, 10, "COMMENT").await.unwrap();
        insert(&pool, b.id, None, 5, "COMMENT").await.unwrap();

        let board = top_totals(&pool, 10).await.unwrap();
        assert_eq!(board.len(), 3);
        assert_eq!((board[0].name.as_str(), board[0].points), ("alice", 10));
        assert_eq!((board[1].name.as_str(), board[1].points), ("bob", 5));
        assert_eq!(board[2].points, 0);

        let capped = top_totals(&pool, 2).await.unwrap();
        assert_eq!(capped.len(), 2);
    }
}
