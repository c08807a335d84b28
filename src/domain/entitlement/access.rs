//! Outcome of gating a subscriber action.

use serde::{Deserialize, Serialize};

use super::{MeteredFeature, PlanTier, Quota};
use crate::domain::foundation::{DomainError, ErrorCode};

/// Result of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessResult {
    /// Access is granted.
    Allowed,
    /// Access is denied with a specific reason.
    Denied(AccessDeniedReason),
}

impl AccessResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessResult::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessResult::Denied(_))
    }

    /// Converts the result to a Result type, with denied becoming an error.
    pub fn into_result(self) -> Result<(), AccessDeniedReason> {
        match self {
            AccessResult::Allowed => Ok(()),
            AccessResult::Denied(reason) => Err(reason),
        }
    }
}

/// Reason why access was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccessDeniedReason {
    /// The monthly quota for a metered feature is used up.
    LimitReached {
        feature: MeteredFeature,
        used: u32,
        limit: Quota,
    },

    /// The capability is not part of the subscriber's plan.
    FeatureNotIncluded {
        /// `feature` or `feature:subFeature`.
        feature: String,
        /// Lowest tier that includes it; absent when no plan does.
        required_tier: Option<PlanTier>,
    },
}

impl AccessDeniedReason {
    /// Get a user-facing message for the denial reason.
    pub fn user_message(&self) -> String {
        match self {
            AccessDeniedReason::LimitReached {
                feature,
                used,
                limit,
            } => format!(
                "You've used {} of {} {} this month. Upgrade to increase your limit!",
                used,
                limit,
                feature.label()
            ),
            AccessDeniedReason::FeatureNotIncluded {
                feature,
                required_tier: Some(tier),
            } => format!("{} requires the {} plan or higher.", feature, tier.display_name()),
            AccessDeniedReason::FeatureNotIncluded {
                feature,
                required_tier: None,
            } => format!("{} is not available on any plan.", feature),
        }
    }
}

impl std::fmt::Display for AccessDeniedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl From<AccessDeniedReason> for DomainError {
    fn from(reason: AccessDeniedReason) -> Self {
        let (code, feature) = match &reason {
            AccessDeniedReason::LimitReached { feature, .. } => {
                (ErrorCode::LimitReached, feature.usage_key().to_string())
            }
            AccessDeniedReason::FeatureNotIncluded { feature, .. } => {
                (ErrorCode::FeatureNotIncluded, feature.clone())
            }
        };
        DomainError::new(code, reason.user_message()).with_detail("feature", feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_is_allowed() {
        let result = AccessResult::Allowed;
        assert!(result.is_allowed());
        assert!(!result.is_denied());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn into_result_denied_is_err() {
        let reason = AccessDeniedReason::FeatureNotIncluded {
            feature: "contracts:calendar".to_string(),
            required_tier: Some(PlanTier::Pro),
        };
        let err = AccessResult::Denied(reason.clone()).into_result().unwrap_err();
        assert_eq!(err, reason);
    }

    #[test]
    fn limit_reached_message_shows_counts() {
        let reason = AccessDeniedReason::LimitReached {
            feature: MeteredFeature::Contracts,
            used: 3,
            limit: Quota::Limited(3),
        };
        assert_eq!(
            reason.user_message(),
            "You've used 3 of 3 contracts this month. Upgrade to increase your limit!"
        );
    }

    #[test]
    fn feature_not_included_names_tier() {
        let reason = AccessDeniedReason::FeatureNotIncluded {
            feature: "rateCalculator:save".to_string(),
            required_tier: Some(PlanTier::Starter),
        };
        let msg = reason.to_string();
        assert!(msg.contains("rateCalculator:save"));
        assert!(msg.contains("Starter"));
    }

    #[test]
    fn denied_reason_serializes_with_type_tag() {
        let reason = AccessDeniedReason::LimitReached {
            feature: MeteredFeature::MediaKits,
            used: 1,
            limit: Quota::Limited(1),
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["type"], "limit_reached");
        assert_eq!(json["feature"], "mediaKits");
        assert_eq!(json["limit"], 1);
    }

    #[test]
    fn denial_converts_to_domain_error() {
        let reason = AccessDeniedReason::LimitReached {
            feature: MeteredFeature::Pitches,
            used: 10,
            limit: Quota::Limited(10),
        };
        let err: DomainError = reason.into();
        assert_eq!(err.code, ErrorCode::LimitReached);
        assert_eq!(err.details.get("feature").map(String::as_str), Some("pitches"));
        assert!(!err.is_retryable());
    }
}
