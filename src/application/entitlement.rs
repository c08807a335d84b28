//! EntitlementEngine - per-subscriber plan gating and usage metering.
//!
//! The engine owns the subscriber's tier and monthly usage counters for
//! the lifetime of a session. Every operation that touches the counters
//! runs under one async mutex, from rollover check through persistence,
//! so concurrent gated actions cannot lose updates.
//!
//! Writes are persist-then-commit: the in-memory state only changes once
//! the store has accepted the new document.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::documents::decode;
use crate::domain::entitlement::{
    limit_notice, upgrade_message, AccessDeniedReason, AccessResult, EntitlementError, Feature,
    LimitCheck, MeteredFeature, MonthKey, Plan, PlanBadge, PlanTier, SubFeature, UsageCounters,
};
use crate::domain::foundation::UserId;
use crate::ports::{Clock, Collection, Persistence, PersistenceError};

/// Field of the profile document holding the tier id.
const PLAN_FIELD: &str = "plan";

#[derive(Debug, Clone)]
struct EntitlementState {
    tier: PlanTier,
    usage: UsageCounters,
}

/// Point-in-time view of a subscriber's entitlements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementSnapshot {
    pub user_id: UserId,
    pub tier: PlanTier,
    pub badge: PlanBadge,
    pub usage: UsageCounters,
    /// Limit check per metered feature, keyed by usage key.
    pub limits: BTreeMap<&'static str, LimitCheck>,
}

/// Plan gating and quota enforcement for one subscriber.
pub struct EntitlementEngine {
    user_id: UserId,
    store: Arc<dyn Persistence>,
    clock: Arc<dyn Clock>,
    state: Mutex<EntitlementState>,
}

impl EntitlementEngine {
    /// Loads the subscriber's tier and usage from the store.
    ///
    /// A missing or unrecognized tier falls back to Free, and missing or
    /// corrupt usage starts from zero. A stale month is rolled over and
    /// persisted immediately.
    pub async fn load(
        user_id: UserId,
        store: Arc<dyn Persistence>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EntitlementError> {
        let current = MonthKey::of(&clock.now());

        let profile = store.get(Collection::Profiles, user_id.as_str()).await?;
        let tier = tier_from_profile(&user_id, profile.as_ref());

        let usage = store
            .get(Collection::Usage, user_id.as_str())
            .await?
            .and_then(|doc| decode::<UsageCounters>(Collection::Usage, user_id.as_str(), doc))
            .unwrap_or_else(|| UsageCounters::fresh(current));

        let engine = Self {
            user_id,
            store,
            clock,
            state: Mutex::new(EntitlementState { tier, usage }),
        };
        {
            let mut state = engine.state.lock().await;
            engine.refresh(&mut state).await?;
        }

        tracing::debug!(user_id = %engine.user_id, tier = %tier, "Entitlements loaded");
        Ok(engine)
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The active tier.
    pub async fn tier(&self) -> PlanTier {
        self.state.lock().await.tier
    }

    /// The full plan of the active tier.
    pub async fn current_tier(&self) -> &'static Plan {
        Plan::for_tier(self.tier().await)
    }

    /// Whether the active plan grants a capability.
    ///
    /// Without a sub-feature any feature area is granted; with one, the
    /// nested value decides.
    pub async fn can_access(&self, feature: Feature, sub: Option<SubFeature>) -> bool {
        self.current_tier().await.features.grants(feature, sub)
    }

    /// [`can_access`](Self::can_access) by name. Unknown names are denied.
    pub async fn can_access_named(&self, feature: &str, sub: Option<&str>) -> bool {
        let Some(feature) = Feature::from_name(feature) else {
            tracing::debug!(feature, "Access check for unknown feature");
            return false;
        };
        let sub = match sub {
            None => None,
            Some(name) => match SubFeature::from_name(name) {
                Some(sub) => Some(sub),
                None => return false,
            },
        };
        self.can_access(feature, sub).await
    }

    /// Compares this month's usage of a metered feature with its quota.
    ///
    /// Unlimited quotas answer without touching the counters.
    pub async fn check_limit(&self, feature: MeteredFeature) -> Result<LimitCheck, EntitlementError> {
        let mut state = self.state.lock().await;
        let quota = feature.quota(&Plan::for_tier(state.tier).features);
        if quota.is_unlimited() {
            return Ok(LimitCheck::unlimited());
        }
        self.refresh(&mut state).await?;
        Ok(LimitCheck::evaluate(quota, state.usage.get(feature)))
    }

    /// [`check_limit`](Self::check_limit) by name. Names that are not
    /// metered get a zero limit.
    pub async fn check_limit_named(&self, name: &str) -> Result<LimitCheck, EntitlementError> {
        match MeteredFeature::from_name(name) {
            Some(feature) => self.check_limit(feature).await,
            None => Ok(LimitCheck::not_metered()),
        }
    }

    /// Records one use of a metered feature and persists the counters.
    ///
    /// Does not enforce the quota; see [`consume`](Self::consume).
    /// Returns the new count.
    pub async fn increment_usage(&self, feature: MeteredFeature) -> Result<u32, EntitlementError> {
        let mut state = self.state.lock().await;
        self.refresh(&mut state).await?;
        self.increment_locked(&mut state, feature).await
    }

    /// Checks the quota and, if there is room, records one use, all under
    /// a single lock acquisition.
    pub async fn consume(&self, feature: MeteredFeature) -> Result<AccessResult, EntitlementError> {
        let mut state = self.state.lock().await;
        let quota = feature.quota(&Plan::for_tier(state.tier).features);
        self.refresh(&mut state).await?;

        let used = state.usage.get(feature);
        if !LimitCheck::evaluate(quota, used).allowed {
            let (area, sub) = feature.capability();
            let reason = if quota.is_granted() {
                AccessDeniedReason::LimitReached {
                    feature,
                    used,
                    limit: quota,
                }
            } else {
                AccessDeniedReason::FeatureNotIncluded {
                    feature: format!("{}:{}", area, sub),
                    required_tier: Plan::required_tier(area, Some(sub)),
                }
            };
            tracing::debug!(user_id = %self.user_id, feature = %feature, used, "Usage denied");
            return Ok(AccessResult::Denied(reason));
        }

        self.increment_locked(&mut state, feature).await?;
        Ok(AccessResult::Allowed)
    }

    /// Switches the subscriber to another tier. Usage counters are kept.
    pub async fn set_tier(&self, tier: PlanTier) -> Result<(), EntitlementError> {
        let mut state = self.state.lock().await;
        if state.tier == tier {
            return Ok(());
        }

        let mut profile = match self
            .store
            .get(Collection::Profiles, self.user_id.as_str())
            .await?
        {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        profile.insert(PLAN_FIELD.to_string(), Value::String(tier.id().to_string()));
        self.store
            .put(Collection::Profiles, self.user_id.as_str(), Value::Object(profile))
            .await?;

        tracing::info!(user_id = %self.user_id, from = %state.tier, to = %tier, "Plan tier changed");
        state.tier = tier;
        Ok(())
    }

    /// [`set_tier`](Self::set_tier) from a tier id; unknown ids are rejected.
    pub async fn set_tier_id(&self, id: &str) -> Result<(), EntitlementError> {
        let tier = id
            .parse::<PlanTier>()
            .map_err(|_| EntitlementError::invalid_tier(id))?;
        self.set_tier(tier).await
    }

    /// This month's counters.
    pub async fn usage(&self) -> Result<UsageCounters, EntitlementError> {
        let mut state = self.state.lock().await;
        self.refresh(&mut state).await?;
        Ok(state.usage.clone())
    }

    /// "You've used X of Y ... this month." for a metered feature.
    pub async fn limit_notice(&self, feature: MeteredFeature) -> Result<String, EntitlementError> {
        let check = self.check_limit(feature).await?;
        Ok(limit_notice(feature, &check))
    }

    /// Lowest tier granting a capability.
    pub fn required_tier(&self, feature: Feature, sub: Option<SubFeature>) -> Option<PlanTier> {
        Plan::required_tier(feature, sub)
    }

    /// Upsell copy for a locked capability.
    pub fn upgrade_message(&self, feature: Feature, sub: Option<SubFeature>) -> &'static str {
        upgrade_message(feature, sub)
    }

    pub async fn badge(&self) -> PlanBadge {
        self.current_tier().await.badge()
    }

    /// Tier, usage, and every metered limit in one consistent read.
    pub async fn snapshot(&self) -> Result<EntitlementSnapshot, EntitlementError> {
        let mut state = self.state.lock().await;
        self.refresh(&mut state).await?;

        let plan = Plan::for_tier(state.tier);
        let limits = MeteredFeature::all()
            .iter()
            .map(|feature| {
                let quota = feature.quota(&plan.features);
                (feature.usage_key(), LimitCheck::evaluate(quota, state.usage.get(*feature)))
            })
            .collect();

        Ok(EntitlementSnapshot {
            user_id: self.user_id.clone(),
            tier: state.tier,
            badge: plan.badge(),
            usage: state.usage.clone(),
            limits,
        })
    }

    /// Rolls stale counters over to the current month and persists them.
    async fn refresh(&self, state: &mut EntitlementState) -> Result<(), EntitlementError> {
        let current = MonthKey::of(&self.clock.now());
        if state.usage.is_current(current) {
            return Ok(());
        }

        let mut next = state.usage.clone();
        next.roll_over(current);
        self.persist_usage(&next).await?;

        tracing::debug!(
            user_id = %self.user_id,
            from = %state.usage.month,
            to = %current,
            "Usage counters rolled over"
        );
        state.usage = next;
        Ok(())
    }

    async fn increment_locked(
        &self,
        state: &mut EntitlementState,
        feature: MeteredFeature,
    ) -> Result<u32, EntitlementError> {
        let mut next = state.usage.clone();
        let count = next.increment(feature);
        self.persist_usage(&next).await?;

        tracing::debug!(user_id = %self.user_id, feature = %feature, count, "Usage recorded");
        state.usage = next;
        Ok(count)
    }

    async fn persist_usage(&self, usage: &UsageCounters) -> Result<(), EntitlementError> {
        let doc = serde_json::to_value(usage).map_err(PersistenceError::from)?;
        self.store
            .put(Collection::Usage, self.user_id.as_str(), doc)
            .await?;
        Ok(())
    }
}

fn tier_from_profile(user_id: &UserId, profile: Option<&Value>) -> PlanTier {
    let id = profile
        .and_then(|p| p.get(PLAN_FIELD))
        .and_then(Value::as_str);
    let tier = PlanTier::from_id_or_default(id);
    if let Some(id) = id {
        if tier.id() != id.trim().to_lowercase() {
            tracing::warn!(user_id = %user_id, plan = id, "Unknown plan id, using Free");
        }
    }
    tier
}

#[cfg(test)]
#[path = "entitlement_test.rs"]
mod entitlement_test;
