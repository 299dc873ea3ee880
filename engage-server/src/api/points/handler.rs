//! Points API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{ledger, user};
use crate::points;
use crate::utils::{AppError, AppResult};
use shared::models::{PointsAdjust, PointsUpdate};

/// GET /api/points/:user_id - 查询用户总分
///
/// Unknown users read as total 0, never an error.
pub async fn get_total(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<PointsUpdate>> {
    let total = points::get_total_points(&state.pool, user_id).await?;
    Ok(Json(PointsUpdate { user_id, total }))
}

/// POST /api/points/:user_id/adjust - 手动积分调整
///
/// Writes a ledger row with no engagement reference. Corrections are new
/// offsetting rows — history is never edited.
pub async fn adjust(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<PointsAdjust>,
) -> AppResult<Json<PointsUpdate>> {
    if payload.reason.trim().is_empty() {
        return Err(AppError::validation("Adjustment reason must not be empty"));
    }
    if user::find_by_id(&state.pool, user_id).await?.is_none() {
        return Err(AppError::not_found(format!("User {user_id}")));
    }

    ledger::insert(&state.pool, user_id, None, payload.delta, payload.reason.trim()).await?;
    let total = ledger::total_for_user(&state.pool, user_id).await?;

    tracing::info!(user_id, delta = payload.delta, total, "Manual points adjustment");
    state.realtime.points_update(user_id, total).await;
    Ok(Json(PointsUpdate { user_id, total }))
}
