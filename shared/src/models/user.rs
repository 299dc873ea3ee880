//! User Model

use serde::{Deserialize, Serialize};

/// User entity
///
/// Created lazily on first successful login (upsert by username).
/// Never deleted by the points engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: i64,
}

/// Login payload — the identity layer hands us a resolved username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLogin {
    pub username: String,
}
