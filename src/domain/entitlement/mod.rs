//! Plan entitlements: the tier catalog, monthly usage metering, and the
//! value types feature gates are evaluated against.

mod access;
mod errors;
mod feature;
mod messages;
mod plan;
mod quota;
mod tier;
mod usage;

pub use access::{AccessDeniedReason, AccessResult};
pub use errors::EntitlementError;
pub use feature::{
    Choice, ExportFormats, ExportQuality, Feature, FeatureValue, FilterLevel,
    NotificationChannels, ReminderChannels, SubFeature, SupportLevel, TemplateAccess,
};
pub use messages::{limit_notice, upgrade_message, upgrade_message_for};
pub use plan::{
    AnalyticsFeatures, ContractFeatures, FeatureMap, MarketplaceFeatures, MediaKitFeatures,
    PitchGeneratorFeatures, Plan, PlanBadge, RateCalculatorFeatures,
};
pub use quota::{LimitCheck, Quota};
pub use tier::PlanTier;
pub use usage::{MeteredFeature, MonthKey, UsageCounters};
