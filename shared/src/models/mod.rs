//! Data models
//!
//! Shared between engage-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps are UTC
//! milliseconds.

pub mod engagement;
pub mod leaderboard;
pub mod ledger;
pub mod oauth_link;
pub mod user;

// Re-exports
pub use engagement::*;
pub use leaderboard::*;
pub use ledger::*;
pub use oauth_link::*;
pub use user::*;
