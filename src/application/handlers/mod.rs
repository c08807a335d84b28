//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod metrics;

pub use metrics::{
    GetMetricsSummaryHandler, GetMetricsSummaryQuery, MetricsOutcome,
    RecalculateUserMetricsCommand, RecalculateUserMetricsHandler, RecalculateUserMetricsResult,
};
