//! Engagement Model
//!
//! 用户互动记录：一条来自外部平台的有效互动（评论、点赞、超级留言、直播聊天）。

use serde::{Deserialize, Serialize};

/// Qualifying engagement event kinds
///
/// Stored as SCREAMING_SNAKE_CASE TEXT in the database (matches the
/// provider-facing names used in raw activity payloads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EventKind {
    Comment,
    Like,
    Superchat,
    LivestreamChat,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Comment,
        EventKind::Like,
        EventKind::Superchat,
        EventKind::LivestreamChat,
    ];

    /// Canonical (storage/reason) name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Comment => "COMMENT",
            EventKind::Like => "LIKE",
            EventKind::Superchat => "SUPERCHAT",
            EventKind::LivestreamChat => "LIVESTREAM_CHAT",
        }
    }

    /// Case-insensitive classification of a provider activity type.
    ///
    /// Returns `None` for unrecognized kinds — callers decide whether to
    /// skip the item or record it with zero points.
    pub fn parse(s: &str) -> Option<EventKind> {
        match s.to_ascii_uppercase().as_str() {
            "COMMENT" => Some(EventKind::Comment),
            "LIKE" => Some(EventKind::Like),
            "SUPERCHAT" => Some(EventKind::Superchat),
            "LIVESTREAM_CHAT" => Some(EventKind::LivestreamChat),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engagement entity — immutable once created
///
/// `(user_id, event_id)` is the dedup key: a later observation of the same
/// provider event id for the same user is a no-op, even if kind or payload
/// differ. `raw_json` is the only field a computed point rule may read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Engagement {
    pub id: i64,
    pub user_id: i64,
    pub event_kind: EventKind,
    pub event_id: String,
    pub timestamp: i64,
    pub raw_json: Option<String>,
}

impl Engagement {
    /// Parsed raw payload, `None` when absent or unparsable.
    ///
    /// Computed point rules read the payload through this accessor (e.g.
    /// a superchat amount); a bad blob degrades to `None`, never a panic.
    pub fn raw_value(&self) -> Option<serde_json::Value> {
        self.raw_json
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// Create engagement payload (reconciliation worker internal)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementCreate {
    pub user_id: i64,
    pub event_kind: EventKind,
    pub event_id: String,
    pub raw_json: Option<String>,
}
