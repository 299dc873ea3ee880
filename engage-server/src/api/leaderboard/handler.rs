//! Leaderboard API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::leaderboard;
use crate::utils::AppResult;
use shared::models::LeaderboardRow;

/// GET /api/leaderboard - 当前排行榜快照（按需计算，与广播同一查询）
pub async fn get_snapshot(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<LeaderboardRow>>> {
    let board = leaderboard::snapshot(&state.pool).await?;
    Ok(Json(board))
}
