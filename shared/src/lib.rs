//! Shared types for the engagement points server
//!
//! 与前端/客户端共享的数据模型和工具函数。
//!
//! - [`models`] - data models (user, engagement, ledger, oauth link)
//! - [`util`] - snowflake IDs and millisecond timestamps

pub mod models;
pub mod util;
