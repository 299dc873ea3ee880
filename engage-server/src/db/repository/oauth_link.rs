//! OAuth Link Repository

use super::{RepoError, RepoResult};
use shared::models::OauthLink;
use sqlx::SqlitePool;

const LINK_SELECT: &str =
    "SELECT id, user_id, provider, token, created_at, updated_at FROM oauth_link";

/// All linked accounts for one provider (reconciliation input).
pub async fn find_by_provider(pool: &SqlitePool, provider: &str) -> RepoResult<Vec<OauthLink>> {
    let sql = format!("{LINK_SELECT} WHERE provider = ? ORDER BY id");
    let rows = sqlx::query_as::<_, OauthLink>(&sql)
        .bind(provider)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_user(
    pool: &SqlitePool,
    user_id: i64,
    provider: &str,
) -> RepoResult<Option<OauthLink>> {
    let sql = format!("{LINK_SELECT} WHERE user_id = ? AND provider = ?");
    let row = sqlx::query_as::<_, OauthLink>(&sql)
        .bind(user_id)
        .bind(provider)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create the link or refresh its token in place.
///
/// At most one live link per `(user_id, provider)` pair.
pub async fn upsert(
    pool: &SqlitePool,
    user_id: i64,
    provider: &str,
    token: &str,
) -> RepoResult<OauthLink> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO oauth_link (id, user_id, provider, token, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
         ON CONFLICT(user_id, provider) DO UPDATE SET token = excluded.token, updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(user_id)
    .bind(provider)
    .bind(token)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_user(pool, user_id, provider)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to upsert oauth link".into()))
}
