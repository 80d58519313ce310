//! Database Module Tests
//!
//! Usage ledger persistence: counters, plan changes and month rollover.

use crate::config::PlanLimits;
use crate::database::{init_db, SqliteUsageLedger};
use crate::error::AppError;
use crate::usage::{Plan, UsageLedger};
use chrono::{DateTime, TimeZone, Utc};
use tempfile::{tempdir, TempDir};

/// Create a ledger backed by a temporary database file.
///
/// The directory guard must outlive the ledger.
async fn create_test_ledger(limits: PlanLimits) -> (SqliteUsageLedger, TempDir) {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("usage.sqlite");
    let db_url = format!("sqlite://{}", db_path.display());

    let pool = init_db(&db_url).await.expect("Failed to initialize database");
    (SqliteUsageLedger::new(pool, limits), dir)
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
}

#[tokio::test]
async fn test_unknown_user_starts_free_and_empty() {
    let (ledger, _dir) = create_test_ledger(PlanLimits::default()).await;

    let status = ledger.check_usage("nobody").await.expect("check failed");
    assert_eq!(status.plan, Plan::Free);
    assert_eq!(status.usage, 0);
    assert_eq!(status.limit, 20);
    assert!(status.can_use);
}

#[tokio::test]
async fn test_charge_persists() {
    let (ledger, _dir) = create_test_ledger(PlanLimits::default()).await;
    let now = at(2024, 4, 10);

    ledger.try_charge_at("u1", now).await.unwrap();
    let status = ledger.try_charge_at("u1", now).await.unwrap();
    assert_eq!(status.usage, 2);
    assert_eq!(status.remaining, 18);

    let reread = ledger.check_usage_at("u1", now).await.unwrap();
    assert_eq!(reread, status);
}

#[tokio::test]
async fn test_limit_reached() {
    let (ledger, _dir) = create_test_ledger(PlanLimits { free: 2, pro: 100 }).await;
    let now = at(2024, 4, 10);

    ledger.try_charge_at("u1", now).await.unwrap();
    let status = ledger.try_charge_at("u1", now).await.unwrap();
    assert!(!status.can_use);
    assert_eq!(status.remaining, 0);

    let err = ledger.try_charge_at("u1", now).await.unwrap_err();
    assert!(matches!(err, AppError::QuotaExceeded { limit: 2 }));
    assert_eq!(ledger.check_usage_at("u1", now).await.unwrap().usage, 2);
}

#[tokio::test]
async fn test_refund_after_charge() {
    let (ledger, _dir) = create_test_ledger(PlanLimits { free: 1, pro: 100 }).await;
    let now = at(2024, 4, 10);

    ledger.try_charge_at("u1", now).await.unwrap();
    let status = ledger.refund_usage_at("u1", now).await.unwrap();
    assert_eq!(status.usage, 0);
    assert!(status.can_use);

    let status = ledger.refund_usage_at("u1", now).await.unwrap();
    assert_eq!(status.usage, 0);
}

#[tokio::test]
async fn test_concurrent_charges_respect_limit() {
    let (ledger, _dir) = create_test_ledger(PlanLimits { free: 3, pro: 100 }).await;
    let now = at(2024, 4, 10);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.try_charge_at("u1", now).await })
        })
        .collect();

    let mut granted = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => granted += 1,
            Err(AppError::QuotaExceeded { limit }) => assert_eq!(limit, 3),
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(granted, 3);
    assert_eq!(ledger.check_usage_at("u1", now).await.unwrap().usage, 3);
}

#[tokio::test]
async fn test_new_month_resets_counter() {
    let (ledger, _dir) = create_test_ledger(PlanLimits::default()).await;

    ledger.try_charge_at("u1", at(2024, 4, 30)).await.unwrap();
    ledger.try_charge_at("u1", at(2024, 4, 30)).await.unwrap();

    let may = ledger.check_usage_at("u1", at(2024, 5, 1)).await.unwrap();
    assert_eq!(may.usage, 0);
    assert_eq!(
        may.reset_date,
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    );

    let charged = ledger.try_charge_at("u1", at(2024, 5, 1)).await.unwrap();
    assert_eq!(charged.usage, 1);
}

#[tokio::test]
async fn test_plan_change_keeps_current_usage() {
    let (ledger, _dir) = create_test_ledger(PlanLimits::default()).await;
    let now = at(2024, 4, 10);

    ledger.try_charge_at("u1", now).await.unwrap();
    let status = ledger.set_plan_at("u1", Plan::Pro, now).await.unwrap();
    assert_eq!(status.plan, Plan::Pro);
    assert_eq!(status.usage, 1);
    assert_eq!(status.limit, 1000);

    let status = ledger.set_plan_at("u2", Plan::Pro, now).await.unwrap();
    assert_eq!(status.usage, 0);
}

#[tokio::test]
async fn test_in_memory_url_is_supported() {
    let pool = init_db("sqlite::memory:").await.expect("in-memory init");
    let ledger = SqliteUsageLedger::new(pool, PlanLimits::default());
    let status = ledger.try_charge("u1").await.unwrap();
    assert_eq!(status.usage, 1);
}
