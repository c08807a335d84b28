//! Integration tests for plan gating and usage metering across sessions.
//!
//! Sessions are started against a file-backed store so state written by
//! one session must be visible to the next, the way a creator returning
//! to the app would see it.

use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

use promosync::adapters::{FileStore, FixedClock, InMemoryStore};
use promosync::application::SessionContext;
use promosync::domain::entitlement::{
    AccessResult, Feature, MeteredFeature, Plan, PlanTier, Quota, SubFeature,
};
use promosync::domain::foundation::{Timestamp, UserId};
use promosync::ports::{Collection, Persistence};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn creator() -> UserId {
    UserId::new("creator-42").unwrap()
}

fn clock_at(y: i32, m: u32, d: u32) -> FixedClock {
    FixedClock::new(Timestamp::from_ymd(y, m, d).unwrap())
}

async fn start(store: &FileStore, clock: &FixedClock) -> SessionContext {
    SessionContext::start(creator(), Arc::new(store.clone()), Arc::new(clock.clone()))
        .await
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn usage_survives_a_new_session() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let clock = clock_at(2024, 5, 6);

    let first = start(&store, &clock).await;
    first
        .entitlements()
        .increment_usage(MeteredFeature::Contracts)
        .await
        .unwrap();
    first
        .entitlements()
        .increment_usage(MeteredFeature::Contracts)
        .await
        .unwrap();
    drop(first);

    let second = start(&store, &clock).await;
    let check = second
        .entitlements()
        .check_limit(MeteredFeature::Contracts)
        .await
        .unwrap();
    assert_eq!(check.used, 2);
    assert_eq!(check.remaining, Quota::Limited(1));
}

#[tokio::test]
async fn new_month_starts_from_zero_across_sessions() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let clock = clock_at(2024, 1, 20);

    let session = start(&store, &clock).await;
    session
        .entitlements()
        .increment_usage(MeteredFeature::MediaKits)
        .await
        .unwrap();
    drop(session);

    clock.set(Timestamp::from_ymd(2024, 2, 1).unwrap());
    let session = start(&store, &clock).await;
    let usage = session.entitlements().usage().await.unwrap();
    assert_eq!(usage.month.to_string(), "2024-2");
    assert_eq!(usage.get(MeteredFeature::MediaKits), 0);

    let stored = store.get(Collection::Usage, "creator-42").await.unwrap().unwrap();
    assert_eq!(stored["month"], "2024-2");
}

#[tokio::test]
async fn upgrade_unlocks_features_and_keeps_counts() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    store
        .put(Collection::Profiles, "creator-42", json!({"plan": "free", "handle": "@ava"}))
        .await
        .unwrap();
    let clock = clock_at(2024, 5, 6);

    let session = start(&store, &clock).await;
    let engine = session.entitlements();
    assert!(engine.consume(MeteredFeature::MediaKits).await.unwrap().is_allowed());
    assert!(engine.consume(MeteredFeature::MediaKits).await.unwrap().is_denied());
    assert!(!engine.can_access(Feature::Contracts, Some(SubFeature::Calendar)).await);

    engine.set_tier_id("pro").await.unwrap();
    drop(session);

    let session = start(&store, &clock).await;
    let engine = session.entitlements();
    assert_eq!(engine.tier().await, PlanTier::Pro);
    assert!(engine.can_access(Feature::Contracts, Some(SubFeature::Calendar)).await);
    assert_eq!(engine.usage().await.unwrap().get(MeteredFeature::MediaKits), 1);
    assert_eq!(engine.consume(MeteredFeature::MediaKits).await.unwrap(), AccessResult::Allowed);

    let profile = store.get(Collection::Profiles, "creator-42").await.unwrap().unwrap();
    assert_eq!(profile["handle"], "@ava");
}

#[tokio::test]
async fn higher_tiers_grant_everything_lower_tiers_do() {
    let store = InMemoryStore::new();
    let clock = clock_at(2024, 5, 6);

    let mut granted_by_previous: Option<Vec<(Feature, Option<SubFeature>)>> = None;
    for tier in PlanTier::all() {
        store
            .put(Collection::Profiles, "creator-42", json!({"plan": tier.id()}))
            .await
            .unwrap();
        let session =
            SessionContext::start(creator(), Arc::new(store.clone()), Arc::new(clock.clone()))
                .await
                .unwrap();

        let mut granted = Vec::new();
        for feature in Feature::all() {
            let subs = feature.sub_features();
            if subs.is_empty() {
                granted.push((*feature, None));
            }
            for sub in subs {
                if session.entitlements().can_access(*feature, Some(*sub)).await {
                    granted.push((*feature, Some(*sub)));
                }
            }
        }

        if let Some(previous) = &granted_by_previous {
            for capability in previous {
                assert!(
                    granted.contains(capability),
                    "{} lost {:?}",
                    tier,
                    capability
                );
            }
        }
        assert_eq!(session.entitlements().current_tier().await, Plan::for_tier(*tier));
        granted_by_previous = Some(granted);
    }
}

#[tokio::test]
async fn unreadable_store_surfaces_as_retryable_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("profiles.yaml"), "{ this is: [not yaml").unwrap();
    let store = FileStore::new(dir.path());
    let clock = clock_at(2024, 5, 6);

    let result =
        SessionContext::start(creator(), Arc::new(store), Arc::new(clock)).await;
    match result {
        Err(err) => assert!(err.is_retryable()),
        Ok(_) => panic!("expected the session to fail"),
    }
}
