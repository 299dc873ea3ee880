//! Engagement Repository

use super::{RepoError, RepoResult};
use shared::models::{Engagement, EngagementCreate};
use sqlx::SqlitePool;

const ENGAGEMENT_SELECT: &str =
    "SELECT id, user_id, event_kind, event_id, timestamp, raw_json FROM engagement";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Engagement>> {
    let sql = format!("{ENGAGEMENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Engagement>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Dedup lookup: `(user_id, event_id)` only — not kind, not timestamp.
/// The first recording of a provider event id wins.
pub async fn find_by_event_id(
    pool: &SqlitePool,
    user_id: i64,
    event_id: &str,
) -> RepoResult<Option<Engagement>> {
    let sql = format!("{ENGAGEMENT_SELECT} WHERE user_id = ? AND event_id = ?");
    let row = sqlx::query_as::<_, Engagement>(&sql)
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a new engagement. Fails with [`RepoError::Duplicate`] when the
/// `(user_id, event_id)` unique constraint is violated — callers in the
/// reconciliation path treat that as "already recorded", not an error.
pub async fn insert(pool: &SqlitePool, data: EngagementCreate) -> RepoResult<Engagement> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO engagement (id, user_id, event_kind, event_id, timestamp, raw_json) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(data.user_id)
    .bind(data.event_kind)
    .bind(&data.event_id)
    .bind(now)
    .bind(&data.raw_json)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create engagement".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{test_support::test_pool, user};
    use shared::models::EventKind;

    fn create_payload(user_id: i64, event_id: &str) -> EngagementCreate {
        EngagementCreate {
            user_id,
            event_kind: EventKind::Comment,
            event_id: event_id.to_string(),
            raw_json: None,
        }
    }

    #[tokio::test]
    async fn insert_and_find_by_event_id() {
        let pool = test_pool().await;
        let u = user::upsert_by_username(&pool, "alice").await.unwrap();

        assert!(
            find_by_event_id(&pool, u.id, "ev-1")
                .await
                .unwrap()
                .is_none()
        );
        let e = insert(&pool, create_payload(u.id, "ev-1")).await.unwrap();
        assert_eq!(e.event_kind, EventKind::Comment);

        let found = find_by_event_id(&pool, u.id, "ev-1").await.unwrap();
        assert_eq!(found.unwrap().id, e.id);
    }

    #[tokio::test]
    async fn duplicate_event_id_per_user_is_rejected() {
        let pool = test_pool().await;
        let u = user::upsert_by_username(&pool, "alice").await.unwrap();
        insert(&pool, create_payload(u.id, "ev-1")).await.unwrap();

        let err = insert(&pool, create_payload(u.id, "ev-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn same_event_id_for_different_users_is_fine() {
        let pool = test_pool().await;
        let a = user::upsert_by_username(&pool, "alice").await.unwrap();
        let b = user::upsert_by_username(&pool, "bob").await.unwrap();
        insert(&pool, create_payload(a.id, "ev-1")).await.unwrap();
        insert(&pool, create_payload(b.id, "ev-1")).await.unwrap();
    }
}
