//! Points API 模块

mod handler;

use crate::core::ServerState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/points", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{user_id}", get(handler::get_total))
        .route("/{user_id}/adjust", post(handler::adjust))
}
