//! Health API 模块

use crate::core::ServerState;
use axum::{Json, Router, routing::get};
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}
