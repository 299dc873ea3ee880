//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录（身份层解析后的用户名落地为 User）
//! - [`points`] - 积分查询和手动调整
//! - [`leaderboard`] - 排行榜快照

pub mod auth;
pub mod health;
pub mod leaderboard;
pub mod points;

use crate::core::ServerState;
use axum::Router;

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(points::router())
        .merge(leaderboard::router())
}
