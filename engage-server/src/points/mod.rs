//! 积分引擎
//!
//! - [`matrix`] - event kind → point rule mapping ([`PointMatrix`])
//! - [`accrual`] - engagement → ledger row → new total ([`apply_points`])

pub mod accrual;
pub mod matrix;

pub use accrual::{PointsError, apply_points, get_total_points};
pub use matrix::{PointMatrix, PointRule};
