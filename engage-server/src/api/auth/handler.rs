//! Auth API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::{AppError, AppResult};
use shared::models::{User, UserLogin};

/// POST /api/auth/login - 首次登录时懒创建用户
///
/// The OAuth handshake itself lives upstream; by the time this endpoint is
/// hit the identity layer has resolved a username.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<UserLogin>,
) -> AppResult<Json<User>> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username must not be empty"));
    }

    let user = user::upsert_by_username(&state.pool, username).await?;
    tracing::debug!(user_id = user.id, username = %user.username, "User logged in");
    Ok(Json(user))
}
