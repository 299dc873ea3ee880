//! Auth API 模块

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::post};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/auth/login", post(handler::login))
}
