//! Integration tests for the dashboard metrics view.
//!
//! Records are written straight into the store the way the surrounding
//! app's CRUD screens would, then read back through a session.

use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use promosync::adapters::{FileStore, FixedClock, InMemoryStore};
use promosync::application::{MetricsOutcome, SessionContext};
use promosync::domain::foundation::{Timestamp, UserId};
use promosync::domain::metrics::{MetricsPeriod, MetricsSummary};
use promosync::ports::{Collection, Persistence};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Wednesday, 15 May 2024.
fn clock() -> FixedClock {
    FixedClock::new(Timestamp::from_ymd(2024, 5, 15).unwrap())
}

fn creator() -> UserId {
    UserId::new("creator-7").unwrap()
}

async fn seed(store: &dyn Persistence, collection: Collection, rows: Vec<(&str, Value)>) {
    for (key, mut doc) in rows {
        doc["user_id"] = json!("creator-7");
        store.put(collection, key, doc).await.unwrap();
    }
}

async fn seed_history(store: &dyn Persistence) {
    seed(
        store,
        Collection::Revenue,
        vec![
            ("r1", json!({"amount": 120.0, "received_at": "2024-05-13T09:00:00Z"})), // Mon
            ("r2", json!({"amount": 80.0, "received_at": "2024-05-14T09:00:00Z"})),  // Tue
            ("r3", json!({"amount": 300.0, "received_at": "2024-03-20T09:00:00Z"})),
            ("r4", json!({"amount": 500.0, "received_at": "2023-11-02T09:00:00Z"})),
        ],
    )
    .await;
    seed(
        store,
        Collection::Contracts,
        vec![
            ("c1", json!({"status": "active", "deal_value": 1000, "created_at": "2024-05-10T00:00:00Z"})),
            ("c2", json!({"status": "completed", "deal_value": 600, "created_at": "2024-05-01T00:00:00Z"})),
            ("c3", json!({"status": "cancelled", "deal_value": 50, "created_at": "2024-04-01T00:00:00Z"})),
        ],
    )
    .await;
    seed(
        store,
        Collection::Applications,
        vec![
            ("a1", json!({"status": "accepted", "created_at": "2024-05-12T00:00:00Z"})),
            ("a2", json!({"status": "pending", "created_at": "2024-05-12T00:00:00Z"})),
        ],
    )
    .await;
}

async fn summary(session: &SessionContext, period: MetricsPeriod) -> MetricsSummary {
    let outcome = session.metrics(period).await;
    assert!(!outcome.is_degraded(), "unexpected degraded outcome for {}", period);
    outcome.into_summary()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn empty_account_shows_zeroed_fixed_axes() {
    let store = InMemoryStore::new();
    let session = SessionContext::start(creator(), Arc::new(store), Arc::new(clock()))
        .await
        .unwrap();

    let month = summary(&session, MetricsPeriod::Month).await;
    assert_eq!(month.revenue_series.labels, vec!["Week 1", "Week 2", "Week 3", "Week 4"]);
    assert_eq!(month.revenue_series.data, vec![0.0; 4]);
    assert_eq!(month.acceptance_rate, 0);

    assert_eq!(summary(&session, MetricsPeriod::Week).await.revenue_series.data.len(), 7);
    assert_eq!(summary(&session, MetricsPeriod::Quarter).await.revenue_series.data.len(), 3);
    assert_eq!(summary(&session, MetricsPeriod::AllTime).await.revenue_series.data.len(), 12);
}

#[tokio::test]
async fn periods_widen_over_the_same_history() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    seed_history(&store).await;
    let session = SessionContext::start(creator(), Arc::new(store), Arc::new(clock()))
        .await
        .unwrap();

    let week = summary(&session, MetricsPeriod::Week).await;
    assert_eq!(week.total_revenue, 200.0);
    assert_eq!(week.revenue_series.data[0], 120.0);
    assert_eq!(week.revenue_series.data[1], 80.0);

    let quarter = summary(&session, MetricsPeriod::Quarter).await;
    assert_eq!(quarter.total_revenue, 500.0);
    assert_eq!(quarter.deal_status.cancelled, 1);

    let year = summary(&session, MetricsPeriod::Year).await;
    assert_eq!(year.total_revenue, 1000.0);
    assert_eq!(year.revenue_series.data[10], 500.0);
    assert_eq!(year.revenue_series.data[4], 200.0);

    let all = summary(&session, MetricsPeriod::AllTime).await;
    assert_eq!(all.total_revenue, year.total_revenue);
}

#[tokio::test]
async fn rates_and_averages_over_the_month() {
    let store = InMemoryStore::new();
    seed_history(&store).await;
    let session = SessionContext::start(creator(), Arc::new(store), Arc::new(clock()))
        .await
        .unwrap();

    let month = summary(&session, MetricsPeriod::Month).await;
    assert_eq!(month.acceptance_rate, 50);
    assert_eq!(month.avg_deal_value, 600.0);
    assert_eq!(month.deal_status.active, 1);
    assert_eq!(month.deal_status.cancelled, 0);
    assert_eq!(month.active_deals, 1);
}

#[tokio::test]
async fn recalculated_rollup_drives_active_deals() {
    let store = InMemoryStore::new();
    seed_history(&store).await;
    let session = SessionContext::start(creator(), Arc::new(store.clone()), Arc::new(clock()))
        .await
        .unwrap();

    let rollup = session.recalculate_metrics().await.unwrap();
    assert_eq!(rollup.active_deals, 1);
    assert_eq!(rollup.total_revenue, 600.0);

    // A deal recorded after the rollup is not reflected until the next one.
    seed(
        &store,
        Collection::Contracts,
        vec![("c4", json!({"status": "active", "deal_value": 10, "created_at": "2024-05-14T00:00:00Z"}))],
    )
    .await;
    let week = summary(&session, MetricsPeriod::Week).await;
    assert_eq!(week.deal_status.active, 2);
    assert_eq!(week.active_deals, 1);

    session.recalculate_metrics().await.unwrap();
    assert_eq!(summary(&session, MetricsPeriod::Week).await.active_deals, 2);
}

#[tokio::test]
async fn outage_after_start_degrades_instead_of_failing() {
    let store = InMemoryStore::new();
    seed_history(&store).await;
    let session = SessionContext::start(creator(), Arc::new(store.clone()), Arc::new(clock()))
        .await
        .unwrap();

    store.set_unavailable(true);
    let outcome = session.metrics(MetricsPeriod::Year).await;
    match outcome {
        MetricsOutcome::Degraded { summary, .. } => {
            assert_eq!(summary, MetricsSummary::empty(MetricsPeriod::Year));
        }
        MetricsOutcome::Fresh(_) => panic!("expected degraded outcome"),
    }
    assert!(session.recalculate_metrics().await.is_err());
}
