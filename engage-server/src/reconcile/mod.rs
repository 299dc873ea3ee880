//! 对账模块 - 外部活动轮询
//!
//! Polls linked external accounts for recent activity, deduplicates events
//! and feeds new ones through the accrual engine.
//!
//! - [`provider`] - activity provider seam + YouTube client
//! - [`worker`] - the periodic reconciliation loop

pub mod provider;
pub mod worker;

pub use provider::{ActivityItem, ActivityProvider, ProviderError, ProviderFactory, YouTubeFactory};
pub use worker::ReconcileWorker;
