//! 服务器配置
//!
//! 所有配置项都可以通过环境变量覆盖：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | HTTP_PORT | 8000 | HTTP 服务端口 |
//! | DATABASE_PATH | engage.db | SQLite 数据库路径 |
//! | ENVIRONMENT | development | 运行环境 |
//! | RECONCILE_INTERVAL_SECS | 60 | 对账轮询间隔（秒）|
//! | LEADERBOARD_INTERVAL_SECS | 15 | 排行榜广播间隔（秒）|
//! | PROVIDER_TIMEOUT_MS | 10000 | 外部 API 请求超时（毫秒）|
//! | POINTS_COMMENT 等 | 5/2/10/1 | 积分矩阵固定值覆盖 |

use crate::points::PointMatrix;
use shared::models::EventKind;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 对账轮询间隔（秒）
    pub reconcile_interval_secs: u64,
    /// 排行榜广播间隔（秒）
    pub leaderboard_interval_secs: u64,
    /// 外部 API 请求超时（毫秒）
    pub provider_timeout_ms: u64,
    /// 积分矩阵固定值 (COMMENT, LIKE, SUPERCHAT, LIVESTREAM_CHAT)
    pub points_comment: i64,
    pub points_like: i64,
    pub points_superchat: i64,
    pub points_livestream_chat: i64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: env_parse("HTTP_PORT", 8000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "engage.db".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            reconcile_interval_secs: env_parse("RECONCILE_INTERVAL_SECS", 60),
            leaderboard_interval_secs: env_parse("LEADERBOARD_INTERVAL_SECS", 15),
            provider_timeout_ms: env_parse("PROVIDER_TIMEOUT_MS", 10_000),
            points_comment: env_parse("POINTS_COMMENT", 5),
            points_like: env_parse("POINTS_LIKE", 2),
            points_superchat: env_parse("POINTS_SUPERCHAT", 10),
            points_livestream_chat: env_parse("POINTS_LIVESTREAM_CHAT", 1),
        }
    }

    /// 使用自定义值覆盖部分配置，常用于测试场景
    pub fn with_overrides(database_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_path = database_path.into();
        config.http_port = http_port;
        config
    }

    /// The active point matrix captured at startup.
    ///
    /// Built once and injected into the accrual engine; later env changes
    /// never touch already-written ledger rows.
    pub fn point_matrix(&self) -> PointMatrix {
        PointMatrix::empty()
            .with_fixed(EventKind::Comment, self.points_comment)
            .with_fixed(EventKind::Like, self.points_like)
            .with_fixed(EventKind::Superchat, self.points_superchat)
            .with_fixed(EventKind::LivestreamChat, self.points_livestream_chat)
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Engagement;

    fn engagement(kind: EventKind) -> Engagement {
        Engagement {
            id: 1,
            user_id: 1,
            event_kind: kind,
            event_id: "ev".into(),
            timestamp: 0,
            raw_json: None,
        }
    }

    #[test]
    fn default_matrix_matches_defaults() {
        let config = Config::with_overrides(":memory:", 0);
        let matrix = config.point_matrix();
        assert_eq!(matrix.resolve(&engagement(EventKind::Comment)), 5);
        assert_eq!(matrix.resolve(&engagement(EventKind::LivestreamChat)), 1);
    }
}
