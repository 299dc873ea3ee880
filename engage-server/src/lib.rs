//! Engage Server - 社区互动积分服务
//!
//! Tracks engagement points in an append-only ledger, reconciles external
//! activity on a schedule and broadcasts a live leaderboard.
//!
//! # 模块结构
//!
//! ```text
//! engage-server/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池、迁移、仓储层
//! ├── points/        # 积分矩阵 + 计分引擎
//! ├── reconcile/     # 外部活动对账 worker
//! ├── leaderboard/   # 排行榜快照和广播
//! ├── realtime/      # socket.io 层
//! └── utils/         # 错误类型、日志
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod leaderboard;
pub mod points;
pub mod realtime;
pub mod reconcile;
pub mod utils;

// Re-export 公共类型
pub use core::{BackgroundTasks, Config, Server, ServerState};
pub use points::{PointMatrix, PointRule, PointsError, apply_points, get_total_points};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
