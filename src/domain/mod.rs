//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `entitlement` - Plan catalog, feature gates, and monthly usage metering
//! - `metrics` - Period-bucketed dashboard metrics and the user rollup

pub mod entitlement;
pub mod foundation;
pub mod metrics;
