//! 服务器状态
//!
//! [`ServerState`] 持有所有共享服务的引用（Arc 浅拷贝）。每个逻辑工作单元
//! （HTTP 请求、一次对账、一次排行榜快照）从连接池取自己的连接，用完即还。

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::core::{BackgroundTasks, Config};
use crate::db::DbService;
use crate::leaderboard::LeaderboardWorker;
use crate::points::PointMatrix;
use crate::realtime::Realtime;
use crate::reconcile::{ReconcileWorker, YouTubeFactory};
use crate::utils::AppError;

/// 服务器状态 - 所有服务的单例引用
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 启动时捕获的积分矩阵（显式注入，无全局配置）
    pub matrix: Arc<PointMatrix>,
    /// socket.io 广播句柄
    pub realtime: Realtime,
}

impl ServerState {
    /// 初始化状态：打开数据库、应用迁移、构建积分矩阵
    pub async fn initialize(config: &Config, realtime: Realtime) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self {
            config: Arc::new(config.clone()),
            pool: db.pool,
            matrix: Arc::new(config.point_matrix()),
            realtime,
        })
    }

    /// 注册两个周期性 worker：对账（默认 60s）和排行榜广播（默认 15s）
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) -> Result<(), AppError> {
        let factory = YouTubeFactory::new(Duration::from_millis(self.config.provider_timeout_ms))
            .map_err(|e| AppError::internal(e.to_string()))?;

        let reconcile = ReconcileWorker::new(
            self.pool.clone(),
            self.matrix.clone(),
            Arc::new(factory),
            Some(self.realtime.clone()),
        );
        let reconcile_interval = Duration::from_secs(self.config.reconcile_interval_secs);
        let cancel = tasks.shutdown_token();
        tasks.spawn("reconcile_worker", async move {
            reconcile.run(reconcile_interval, cancel).await;
        });

        let leaderboard = LeaderboardWorker::new(self.pool.clone(), self.realtime.clone());
        let leaderboard_interval = Duration::from_secs(self.config.leaderboard_interval_secs);
        let cancel = tasks.shutdown_token();
        tasks.spawn("leaderboard_publisher", async move {
            leaderboard.run(leaderboard_interval, cancel).await;
        });

        tracing::info!(count = tasks.len(), "Background tasks registered");
        Ok(())
    }
}
