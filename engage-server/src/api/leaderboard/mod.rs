//! Leaderboard API 模块

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::get};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/leaderboard", get(handler::get_snapshot))
}
