//! RecalculateUserMetricsHandler - Command handler that rebuilds the
//! persisted per-user rollup from the subscriber's deals.

use std::sync::Arc;

use super::OWNER_FIELD;
use crate::application::documents::decode_all;
use crate::domain::foundation::UserId;
use crate::domain::metrics::{DealRecord, UserMetrics};
use crate::ports::{Clock, Collection, Persistence, PersistenceError, QueryFilter};

/// Command to recompute one subscriber's rollup.
#[derive(Debug, Clone)]
pub struct RecalculateUserMetricsCommand {
    pub user_id: UserId,
}

/// Result of a recalculation: the rollup as stored.
pub type RecalculateUserMetricsResult = UserMetrics;

/// Handler for rollup recalculation.
///
/// Unlike the summary query, store failures propagate to the caller.
pub struct RecalculateUserMetricsHandler {
    store: Arc<dyn Persistence>,
    clock: Arc<dyn Clock>,
}

impl RecalculateUserMetricsHandler {
    pub fn new(store: Arc<dyn Persistence>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn handle(
        &self,
        cmd: RecalculateUserMetricsCommand,
    ) -> Result<RecalculateUserMetricsResult, PersistenceError> {
        let owned = QueryFilter::all().eq(OWNER_FIELD, cmd.user_id.as_str());
        let deals: Vec<DealRecord> = decode_all(
            Collection::Contracts,
            self.store.query(Collection::Contracts, &owned).await?,
        );

        let metrics = UserMetrics::from_deals(&deals, self.clock.now());
        let doc = serde_json::to_value(&metrics)?;
        self.store
            .put(Collection::UserMetrics, cmd.user_id.as_str(), doc)
            .await?;

        tracing::debug!(
            user_id = %cmd.user_id,
            deals = deals.len(),
            active_deals = metrics.active_deals,
            "User metrics recalculated"
        );
        Ok(metrics)
    }
}
