//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The entitlement engine is stateful per session; the metrics handlers
//! are stateless and read through on every call.

mod documents;
pub mod entitlement;
pub mod handlers;
pub mod session;

pub use entitlement::{EntitlementEngine, EntitlementSnapshot};
pub use handlers::{
    GetMetricsSummaryHandler, GetMetricsSummaryQuery, MetricsOutcome,
    RecalculateUserMetricsCommand, RecalculateUserMetricsHandler, RecalculateUserMetricsResult,
};
pub use session::SessionContext;
