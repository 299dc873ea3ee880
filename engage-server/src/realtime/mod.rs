//! Realtime Module
//!
//! socket.io layer for live point updates and leaderboard broadcasts.
//! Every connecting socket joins the `public` room and receives the next
//! scheduled broadcast — there is no replay of past snapshots.

use shared::models::{LeaderboardRow, PointsUpdate};
use socketioxide::{SocketIo, extract::SocketRef, layer::SocketIoLayer};

/// Broadcast room all subscribers join on connect
pub const PUBLIC_ROOM: &str = "public";

/// Cheap-to-clone handle for emitting realtime events.
#[derive(Clone)]
pub struct Realtime {
    io: SocketIo,
}

impl Realtime {
    /// Build the socket.io layer (for the axum router) and its handle.
    pub fn new() -> (SocketIoLayer, Realtime) {
        let (layer, io) = SocketIo::new_layer();
        io.ns("/", on_connect);
        (layer, Realtime { io })
    }

    /// Emit `points_update {user_id, total}` after an account reconciles.
    pub async fn points_update(&self, user_id: i64, total: i64) {
        if let Err(e) = self
            .io
            .to(PUBLIC_ROOM)
            .emit("points_update", &PointsUpdate { user_id, total })
            .await
        {
            tracing::warn!(error = %e, "Failed to broadcast points_update");
        }
    }

    /// Emit the ranked `leaderboard` snapshot.
    pub async fn leaderboard(&self, board: &[LeaderboardRow]) {
        if let Err(e) = self.io.to(PUBLIC_ROOM).emit("leaderboard", &board).await {
            tracing::warn!(error = %e, "Failed to broadcast leaderboard");
        }
    }
}

async fn on_connect(socket: SocketRef) {
    tracing::debug!(socket_id = %socket.id, "Socket connected");
    socket.join(PUBLIC_ROOM);
}
