//! Metrics handlers.
//!
//! ## Queries
//! - Get the period-bucketed dashboard summary for a subscriber
//!
//! ## Commands
//! - Recalculate the persisted per-user rollup

mod get_metrics_summary;
mod recalculate_user_metrics;

/// Document field linking records to their owner.
pub(crate) const OWNER_FIELD: &str = "user_id";

// Queries
pub use get_metrics_summary::{GetMetricsSummaryHandler, GetMetricsSummaryQuery, MetricsOutcome};

// Commands
pub use recalculate_user_metrics::{
    RecalculateUserMetricsCommand, RecalculateUserMetricsHandler, RecalculateUserMetricsResult,
};
