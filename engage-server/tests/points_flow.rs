//! End-to-end points flow against a file-backed database: login upsert,
//! accrual, manual adjustment and the leaderboard snapshot, all through the
//! migration path.

use engage_server::db::DbService;
use engage_server::db::repository::{engagement, ledger, user};
use engage_server::points::{PointMatrix, apply_points, get_total_points};
use engage_server::{PointRule, leaderboard};
use shared::models::{EngagementCreate, EventKind};
use std::sync::Arc;

async fn open_db(dir: &tempfile::TempDir) -> DbService {
    let path = dir.path().join("engage.db");
    DbService::new(path.to_str().unwrap()).await.unwrap()
}

#[tokio::test]
async fn full_accrual_flow() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir).await;

    // Lazy user creation on first login
    let alice = user::upsert_by_username(&db.pool, "alice").await.unwrap();
    assert_eq!(get_total_points(&db.pool, alice.id).await.unwrap(), 0);

    // A comment observed from the provider
    let e = engagement::insert(
        &db.pool,
        EngagementCreate {
            user_id: alice.id,
            event_kind: EventKind::Comment,
            event_id: "yt-1".into(),
            raw_json: None,
        },
    )
    .await
    .unwrap();

    let matrix = PointMatrix::empty().with_fixed(EventKind::Comment, 3);
    let total = apply_points(&db.pool, &matrix, &alice, &e).await.unwrap();
    assert_eq!(total, 3);

    // Manual adjustment: offsetting row, history untouched
    ledger::insert(&db.pool, alice.id, None, -1, "moderation penalty")
        .await
        .unwrap();
    assert_eq!(get_total_points(&db.pool, alice.id).await.unwrap(), 2);

    let rows = ledger::find_by_user(&db.pool, alice.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].points_delta, 3);
    assert_eq!(rows[0].engagement_id, Some(e.id));
    assert_eq!(rows[1].engagement_id, None);
}

#[tokio::test]
async fn computed_superchat_rule_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir).await;

    let bob = user::upsert_by_username(&db.pool, "bob").await.unwrap();
    let e = engagement::insert(
        &db.pool,
        EngagementCreate {
            user_id: bob.id,
            event_kind: EventKind::Superchat,
            event_id: "yt-sc-1".into(),
            raw_json: Some(r#"{"amount": 4}"#.into()),
        },
    )
    .await
    .unwrap();

    let matrix = PointMatrix::empty().with_rule(
        EventKind::Superchat,
        PointRule::Computed(Arc::new(|e| {
            e.raw_value()
                .and_then(|v| v.get("amount").and_then(|a| a.as_i64()))
                .unwrap_or(0)
                * 10
        })),
    );

    let total = apply_points(&db.pool, &matrix, &bob, &e).await.unwrap();
    assert_eq!(total, 40);
}

#[tokio::test]
async fn leaderboard_reflects_ledger_state() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir).await;

    let alice = user::upsert_by_username(&db.pool, "alice").await.unwrap();
    let bob = user::upsert_by_username(&db.pool, "bob").await.unwrap();
    ledger::insert(&db.pool, alice.id, None, 10, "seed").await.unwrap();
    ledger::insert(&db.pool, bob.id, None, 5, "seed").await.unwrap();

    let board = leaderboard::snapshot(&db.pool).await.unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!((board[0].name.as_str(), board[0].points), ("alice", 10));
    assert_eq!((board[1].name.as_str(), board[1].points), ("bob", 5));
}
