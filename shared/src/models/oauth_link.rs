//! OAuth Link Model

use serde::{Deserialize, Serialize};

/// External account credential
///
/// At most one live link per `(user_id, provider)` pair; a token refresh
/// replaces the blob in place. `token` is an opaque JSON string — only the
/// provider client interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OauthLink {
    pub id: i64,
    pub user_id: i64,
    pub provider: String,
    pub token: String,
    pub created_at: i64,
    pub updated_at: i64,
}
