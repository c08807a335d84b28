//! SessionContext - everything one subscriber session needs.
//!
//! Built once when the session starts and dropped when it ends. There is
//! no process-wide state; two sessions for the same subscriber each load
//! their own engine.

use std::sync::Arc;

use super::entitlement::EntitlementEngine;
use super::handlers::{
    GetMetricsSummaryHandler, GetMetricsSummaryQuery, MetricsOutcome,
    RecalculateUserMetricsCommand, RecalculateUserMetricsHandler,
};
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::UserId;
use crate::domain::metrics::{MetricsPeriod, UserMetrics};
use crate::ports::{Clock, Persistence, PersistenceError};

pub struct SessionContext {
    user_id: UserId,
    entitlements: EntitlementEngine,
    summary: GetMetricsSummaryHandler,
    recalculate: RecalculateUserMetricsHandler,
}

impl SessionContext {
    /// Loads the subscriber's entitlements and wires the metrics handlers
    /// to the same store and clock.
    pub async fn start(
        user_id: UserId,
        store: Arc<dyn Persistence>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EntitlementError> {
        let entitlements =
            EntitlementEngine::load(user_id.clone(), Arc::clone(&store), Arc::clone(&clock))
                .await?;

        tracing::info!(user_id = %user_id, tier = %entitlements.tier().await, "Session started");

        Ok(Self {
            summary: GetMetricsSummaryHandler::new(Arc::clone(&store), Arc::clone(&clock)),
            recalculate: RecalculateUserMetricsHandler::new(store, clock),
            user_id,
            entitlements,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn entitlements(&self) -> &EntitlementEngine {
        &self.entitlements
    }

    /// Dashboard metrics for the period. Never fails; see [`MetricsOutcome`].
    pub async fn metrics(&self, period: MetricsPeriod) -> MetricsOutcome {
        self.summary
            .handle(GetMetricsSummaryQuery {
                user_id: self.user_id.clone(),
                period,
            })
            .await
    }

    /// Rebuilds and stores the subscriber's metrics rollup.
    pub async fn recalculate_metrics(&self) -> Result<UserMetrics, PersistenceError> {
        self.recalculate
            .handle(RecalculateUserMetricsCommand {
                user_id: self.user_id.clone(),
            })
            .await
    }
}
