//! Reconciliation Worker
//!
//! Periodic pass over every linked account: build a client from the stored
//! token, probe the credential, fetch recent activity, record new
//! engagements (dedup by `(user_id, event_id)`, first recording wins),
//! credit them through the accrual engine, then publish the owner's new
//! total.
//!
//! Failure isolation: a failing account is skipped for the current pass, a
//! bad item is skipped within its account. Nothing here aborts the loop.

use crate::db::repository::{RepoError, engagement, ledger, oauth_link, user};
use crate::points::{PointMatrix, apply_points};
use crate::realtime::Realtime;
use crate::reconcile::provider::ProviderFactory;
use shared::models::{EngagementCreate, EventKind, OauthLink, User};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Provider name engagements are sourced from
pub const ENGAGEMENT_PROVIDER: &str = "youtube";

pub struct ReconcileWorker {
    pool: SqlitePool,
    matrix: Arc<PointMatrix>,
    factory: Arc<dyn ProviderFactory>,
    realtime: Option<Realtime>,
}

impl ReconcileWorker {
    pub fn new(
        pool: SqlitePool,
        matrix: Arc<PointMatrix>,
        factory: Arc<dyn ProviderFactory>,
        realtime: Option<Realtime>,
    ) -> Self {
        Self {
            pool,
            matrix,
            factory,
            realtime,
        }
    }

    /// Run until cancelled, one pass per interval tick.
    pub async fn run(self, interval: Duration, cancel: CancellationToken) {
        tracing::info!(interval_secs = interval.as_secs(), "Reconcile worker started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Reconcile worker stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_pass().await;
                }
            }
        }
    }

    /// One reconciliation pass across all linked accounts.
    ///
    /// Public so tests (and a future admin trigger) can drive single passes
    /// without waiting on the interval.
    pub async fn run_pass(&self) {
        let links = match oauth_link::find_by_provider(&self.pool, ENGAGEMENT_PROVIDER).await {
            Ok(links) => links,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load oauth links, skipping pass");
                return;
            }
        };

        for link in links {
            if let Err(e) = self.reconcile_account(&link).await {
                tracing::warn!(
                    user_id = link.user_id,
                    error = %e,
                    "Account reconciliation failed, skipping this pass"
                );
            }
        }
    }

    async fn reconcile_account(&self, link: &OauthLink) -> anyhow::Result<()> {
        let Some(client) = self.factory.build(&link.token) else {
            tracing::warn!(user_id = link.user_id, "Malformed token, skipping account");
            return Ok(());
        };

        // Credential probe — revoked/expired tokens drop out here
        client.verify().await?;

        let Some(owner) = user::find_by_id(&self.pool, link.user_id).await? else {
            tracing::warn!(user_id = link.user_id, "Oauth link without user, skipping");
            return Ok(());
        };

        let items = client.recent_activities().await?;
        let mut credited = 0usize;

        for item in items {
            // No provider event id → cannot dedup, skip the item
            let Some(event_id) = item.event_id else {
                continue;
            };
            match self
                .record_item(&owner, &event_id, item.kind.as_deref(), &item.raw)
                .await
            {
                Ok(true) => credited += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(event_id = %event_id, error = %e, "Skipping activity item");
                }
            }
        }

        let total = ledger::total_for_user(&self.pool, owner.id).await?;
        if let Some(realtime) = &self.realtime {
            realtime.points_update(owner.id, total).await;
        }

        if credited > 0 {
            tracing::info!(
                user_id = owner.id,
                credited,
                total,
                "Account reconciled with new engagements"
            );
        }
        Ok(())
    }

    /// Dedup-then-accrue for one activity item. Returns whether a new
    /// engagement was recorded and credited.
    async fn record_item(
        &self,
        owner: &User,
        event_id: &str,
        kind: Option<&str>,
        raw: &serde_json::Value,
    ) -> anyhow::Result<bool> {
        // First recording wins, regardless of kind or payload
        if engagement::find_by_event_id(&self.pool, owner.id, event_id)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        // Unrecognized kinds are dropped before anything is recorded
        let Some(event_kind) = kind.and_then(EventKind::parse) else {
            return Ok(false);
        };

        let created = match engagement::insert(
            &self.pool,
            EngagementCreate {
                user_id: owner.id,
                event_kind,
                event_id: event_id.to_string(),
                raw_json: serde_json::to_string(raw).ok(),
            },
        )
        .await
        {
            Ok(e) => e,
            // Lost the check-then-insert race: another writer recorded it
            Err(RepoError::Duplicate(_)) => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        apply_points(&self.pool, &self.matrix, owner, &created).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use crate::reconcile::provider::{ActivityItem, ActivityProvider, ProviderError};
    use async_trait::async_trait;
    use serde_json::json;

    /// Scripted provider: serves a fixed item list, optionally failing the
    /// credential probe or the fetch.
    struct FakeProvider {
        items: Vec<ActivityItem>,
        fail_verify: bool,
    }

    #[async_trait]
    impl ActivityProvider for FakeProvider {
        async fn verify(&self) -> Result<(), ProviderError> {
            if self.fail_verify {
                Err(ProviderError::Credential("revoked".into()))
            } else {
                Ok(())
            }
        }

        async fn recent_activities(&self) -> Result<Vec<ActivityItem>, ProviderError> {
            Ok(self.items.clone())
        }
    }

    /// Factory keyed on the token blob: `"bad"` is malformed, `"revoked"`
    /// fails the probe, anything else serves the scripted items.
    struct FakeFactory {
        items: Vec<ActivityItem>,
    }

    impl ProviderFactory for FakeFactory {
        fn build(&self, token: &str) -> Option<Box<dyn ActivityProvider>> {
            if token == "bad" {
                return None;
            }
            Some(Box::new(FakeProvider {
                items: self.items.clone(),
                fail_verify: token == "revoked",
            }))
        }
    }

    fn item(event_id: Option<&str>, kind: Option<&str>) -> ActivityItem {
        ActivityItem {
            event_id: event_id.map(str::to_string),
            kind: kind.map(str::to_string),
            raw: json!({"id": event_id, "snippet": {"type": kind}}),
        }
    }

    fn worker(pool: &SqlitePool, items: Vec<ActivityItem>) -> ReconcileWorker {
        ReconcileWorker::new(
            pool.clone(),
            Arc::new(PointMatrix::default()),
            Arc::new(FakeFactory { items }),
            None,
        )
    }

    async fn link_user(pool: &SqlitePool, name: &str, token: &str) -> User {
        let u = user::upsert_by_username(pool, name).await.unwrap();
        oauth_link::upsert(pool, u.id, ENGAGEMENT_PROVIDER, token)
            .await
            .unwrap();
        u
    }

    #[tokio::test]
    async fn pass_credits_new_activity() {
        let pool = test_pool().await;
        let alice = link_user(&pool, "alice", "ok").await;

        let w = worker(
            &pool,
            vec![item(Some("ev-1"), Some("comment")), item(Some("ev-2"), Some("like"))],
        );
        w.run_pass().await;

        // COMMENT=5 + LIKE=2 under the default matrix
        assert_eq!(ledger::total_for_user(&pool, alice.id).await.unwrap(), 7);
        assert_eq!(ledger::find_by_user(&pool, alice.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn repeated_passes_are_idempotent() {
        // P3: same provider event id fed through twice → one engagement,
        // one ledger row, total unchanged
        let pool = test_pool().await;
        let alice = link_user(&pool, "alice", "ok").await;

        let w = worker(&pool, vec![item(Some("ev-1"), Some("comment"))]);
        w.run_pass().await;
        let total_after_first = ledger::total_for_user(&pool, alice.id).await.unwrap();
        w.run_pass().await;

        assert_eq!(
            ledger::total_for_user(&pool, alice.id).await.unwrap(),
            total_after_first
        );
        assert_eq!(ledger::find_by_user(&pool, alice.id).await.unwrap().len(), 1);
        assert!(
            engagement::find_by_event_id(&pool, alice.id, "ev-1")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn unrecognized_kind_is_dropped_without_recording() {
        // Reconciliation call site of P4: no engagement, no ledger row
        let pool = test_pool().await;
        let alice = link_user(&pool, "alice", "ok").await;

        let w = worker(&pool, vec![item(Some("ev-1"), Some("playlistItem"))]);
        w.run_pass().await;

        assert!(
            engagement::find_by_event_id(&pool, alice.id, "ev-1")
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(ledger::find_by_user(&pool, alice.id).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn items_without_event_id_are_skipped() {
        let pool = test_pool().await;
        let alice = link_user(&pool, "alice", "ok").await;

        let w = worker(
            &pool,
            vec![item(None, Some("comment")), item(Some("ev-2"), Some("comment"))],
        );
        w.run_pass().await;

        assert_eq!(ledger::find_by_user(&pool, alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failing_account_does_not_block_the_rest() {
        let pool = test_pool().await;
        // bob's token is malformed, carol's credential is revoked; alice
        // still reconciles in the same pass
        let bob = link_user(&pool, "bob", "bad").await;
        let carol = link_user(&pool, "carol", "revoked").await;
        let alice = link_user(&pool, "alice", "ok").await;

        let w = worker(&pool, vec![item(Some("ev-1"), Some("comment"))]);
        w.run_pass().await;

        assert_eq!(ledger::total_for_user(&pool, alice.id).await.unwrap(), 5);
        assert_eq!(ledger::total_for_user(&pool, bob.id).await.unwrap(), 0);
        assert_eq!(ledger::total_for_user(&pool, carol.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn kind_classification_is_case_insensitive() {
        let pool = test_pool().await;
        let alice = link_user(&pool, "alice", "ok").await;

        let w = worker(&pool, vec![item(Some("ev-1"), Some("COMMENT"))]);
        w.run_pass().await;

        let recorded = engagement::find_by_event_id(&pool, alice.id, "ev-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(recorded.event_kind, EventKind::Comment);
    }
}
