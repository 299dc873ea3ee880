//! Accrual Engine
//!
//! Converts one qualifying engagement into exactly one ledger row and
//! returns the user's new derived total.
//!
//! Idempotence is deliberately NOT this layer's job: calling
//! [`apply_points`] twice for the same engagement writes two rows. The
//! reconciliation path deduplicates upstream (`(user_id, event_id)` check
//! plus unique constraint) before it ever reaches this function.

use crate::db::repository::{RepoError, ledger, user};
use crate::points::matrix::PointMatrix;
use shared::models::{Engagement, User};
use sqlx::SqlitePool;
use thiserror::Error;

/// Accrual errors
#[derive(Debug, Error)]
pub enum PointsError {
    /// The user has no persisted row backing it — precondition failure,
    /// surfaced to the caller, never retried.
    #[error("User {0} is not attached to the store")]
    DetachedEntity(i64),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Apply points for an engagement.
///
/// Resolves the delta against the injected matrix, appends one immutable
/// ledger row (reason = event kind name) and returns the new total. The
/// row is visible to concurrent readers as soon as the insert commits.
pub async fn apply_points(
    pool: &SqlitePool,
    matrix: &PointMatrix,
    user: &User,
    engagement: &Engagement,
) -> Result<i64, PointsError> {
    if !user::exists(pool, user.id).await? {
        return Err(PointsError::DetachedEntity(user.id));
    }

    let delta = matrix.resolve(engagement);
    ledger::insert(
        pool,
        user.id,
        Some(engagement.id),
        delta,
        engagement.event_kind.as_str(),
    )
    .await?;

    tracing::debug!(
        user_id = user.id,
        engagement_id = engagement.id,
        delta,
        kind = %engagement.event_kind,
        "Points applied"
    );

    Ok(ledger::total_for_user(pool, user.id).await?)
}

/// Derived total for a user: 0 for unknown or pointless users.
pub async fn get_total_points(pool: &SqlitePool, user_id: i64) -> Result<i64, RepoError> {
    ledger::total_for_user(pool, user_id).await
}
