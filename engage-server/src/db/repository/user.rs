//! User Repository

use super::{RepoError, RepoResult};
use shared::models::User;
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>("SELECT id, username, created_at FROM user WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let row =
        sqlx::query_as::<_, User>("SELECT id, username, created_at FROM user WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Create the user if absent, else return the existing row.
///
/// Lazy creation on first successful login — the identity layer only hands
/// us a resolved username.
pub async fn upsert_by_username(pool: &SqlitePool, username: &str) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT OR IGNORE INTO user (id, username, created_at) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(username)
        .bind(now)
        .execute(pool)
        .await?;
    find_by_username(pool, username)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Failed to upsert user {username}")))
}

/// Whether a user row with this id is persisted
pub async fn exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM user WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}
