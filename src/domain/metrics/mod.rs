//! Dashboard metrics: period-bucketed summaries of deals, applications,
//! and revenue, plus the persisted per-user rollup.

pub mod aggregator;
pub mod bucket;
mod period;
mod records;
mod rollup;
mod summary;

pub use aggregator::summarize;
pub use period::MetricsPeriod;
pub use records::{
    ApplicationRecord, ApplicationStatus, DealRecord, DealStatus, MetricsInput, RevenueRecord,
};
pub use rollup::UserMetrics;
pub use summary::{ApplicationStatusCounts, DealStatusCounts, MetricsSummary, RevenueSeries};
