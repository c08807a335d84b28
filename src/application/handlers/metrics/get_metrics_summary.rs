//! GetMetricsSummaryHandler - Query handler for the dashboard metrics view.
//!
//! This query never fails. A store failure yields the empty summary tagged
//! as degraded, so callers can tell "no data yet" from "could not fetch".

use serde::Serialize;
use std::sync::Arc;

use super::OWNER_FIELD;
use crate::application::documents::{decode, decode_all};
use crate::domain::foundation::UserId;
use crate::domain::metrics::{
    summarize, ApplicationRecord, DealRecord, DealStatus, MetricsInput, MetricsPeriod,
    MetricsSummary, RevenueRecord, UserMetrics,
};
use crate::ports::{Clock, Collection, Persistence, PersistenceError, QueryFilter};

/// Query for one subscriber's metrics over a period.
#[derive(Debug, Clone)]
pub struct GetMetricsSummaryQuery {
    pub user_id: UserId,
    pub period: MetricsPeriod,
}

/// A summary, and whether it reflects the stored records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MetricsOutcome {
    /// Computed from the subscriber's records.
    Fresh(MetricsSummary),
    /// Records could not be fetched; `summary` is the empty summary.
    Degraded {
        summary: MetricsSummary,
        reason: String,
    },
}

impl MetricsOutcome {
    pub fn summary(&self) -> &MetricsSummary {
        match self {
            MetricsOutcome::Fresh(summary) => summary,
            MetricsOutcome::Degraded { summary, .. } => summary,
        }
    }

    pub fn into_summary(self) -> MetricsSummary {
        match self {
            MetricsOutcome::Fresh(summary) => summary,
            MetricsOutcome::Degraded { summary, .. } => summary,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, MetricsOutcome::Degraded { .. })
    }
}

/// Handler for the metrics summary query.
pub struct GetMetricsSummaryHandler {
    store: Arc<dyn Persistence>,
    clock: Arc<dyn Clock>,
}

impl GetMetricsSummaryHandler {
    pub fn new(store: Arc<dyn Persistence>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn handle(&self, query: GetMetricsSummaryQuery) -> MetricsOutcome {
        match self.fetch(&query.user_id).await {
            Ok(input) => {
                MetricsOutcome::Fresh(summarize(&input, query.period, &self.clock.now()))
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %query.user_id,
                    period = %query.period,
                    error = %e,
                    "Metrics fetch failed, serving empty summary"
                );
                MetricsOutcome::Degraded {
                    summary: MetricsSummary::empty(query.period),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch(&self, user_id: &UserId) -> Result<MetricsInput, PersistenceError> {
        let owned = QueryFilter::all().eq(OWNER_FIELD, user_id.as_str());

        let deals: Vec<DealRecord> = decode_all(
            Collection::Contracts,
            self.store.query(Collection::Contracts, &owned).await?,
        );
        let applications: Vec<ApplicationRecord> = decode_all(
            Collection::Applications,
            self.store.query(Collection::Applications, &owned).await?,
        );
        let revenue: Vec<RevenueRecord> = decode_all(
            Collection::Revenue,
            self.store.query(Collection::Revenue, &owned).await?,
        );

        // The rollup is authoritative when present; otherwise count live.
        let rollup = self
            .store
            .get(Collection::UserMetrics, user_id.as_str())
            .await?
            .and_then(|doc| decode::<UserMetrics>(Collection::UserMetrics, user_id.as_str(), doc));
        let active_deals = match rollup {
            Some(metrics) => metrics.active_deals,
            None => deals
                .iter()
                .filter(|d| d.status == DealStatus::Active)
                .count() as u32,
        };

        Ok(MetricsInput {
            deals,
            applications,
            revenue,
            active_deals,
        })
    }
}
