//! Monthly quota values and limit checks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A count limit that may be unbounded.
///
/// Serializes as a plain number, or `null` when unlimited. The derived
/// ordering places every `Limited` value below `Unlimited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quota {
    Limited(u32),
    Unlimited,
}

impl Quota {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Quota::Unlimited)
    }

    /// A zero quota grants nothing; every other quota grants the feature.
    pub fn is_granted(&self) -> bool {
        !matches!(self, Quota::Limited(0))
    }

    /// What is left after `used` units have been consumed, floored at zero.
    pub fn remaining_after(&self, used: u32) -> Quota {
        match self {
            Quota::Limited(n) => Quota::Limited(n.saturating_sub(used)),
            Quota::Unlimited => Quota::Unlimited,
        }
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quota::Limited(n) => write!(f, "{}", n),
            Quota::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// Outcome of comparing a feature's monthly usage against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitCheck {
    pub allowed: bool,
    pub remaining: Quota,
    pub limit: Quota,
    pub used: u32,
}

impl LimitCheck {
    /// Evaluates a limit against current usage.
    ///
    /// Unlimited quotas short-circuit without looking at usage, so `used`
    /// is reported as zero for them.
    pub fn evaluate(limit: Quota, used: u32) -> Self {
        match limit {
            Quota::Unlimited => Self::unlimited(),
            Quota::Limited(_) => {
                let remaining = limit.remaining_after(used);
                Self {
                    allowed: remaining != Quota::Limited(0),
                    remaining,
                    limit,
                    used,
                }
            }
        }
    }

    /// The result for an unbounded quota.
    pub fn unlimited() -> Self {
        Self {
            allowed: true,
            remaining: Quota::Unlimited,
            limit: Quota::Unlimited,
            used: 0,
        }
    }

    /// The result for a feature the catalog does not meter.
    pub fn not_metered() -> Self {
        Self::evaluate(Quota::Limited(0), 0)
    }

    /// True when the last unit has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Quota::Limited(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_outranks_any_limit() {
        assert!(Quota::Unlimited > Quota::Limited(u32::MAX));
        assert!(Quota::Limited(10) > Quota::Limited(5));
    }

    #[test]
    fn zero_quota_is_not_granted() {
        assert!(!Quota::Limited(0).is_granted());
        assert!(Quota::Limited(1).is_granted());
        assert!(Quota::Unlimited.is_granted());
    }

    #[test]
    fn quota_serializes_as_number_or_null() {
        assert_eq!(serde_json::to_string(&Quota::Limited(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Quota::Unlimited).unwrap(), "null");
        assert_eq!(serde_json::from_str::<Quota>("null").unwrap(), Quota::Unlimited);
    }

    #[test]
    fn evaluate_under_limit() {
        let check = LimitCheck::evaluate(Quota::Limited(3), 2);
        assert!(check.allowed);
        assert_eq!(check.remaining, Quota::Limited(1));
        assert_eq!(check.used, 2);
    }

    #[test]
    fn evaluate_at_limit_is_denied() {
        let check = LimitCheck::evaluate(Quota::Limited(3), 3);
        assert!(!check.allowed);
        assert!(check.is_exhausted());
    }

    #[test]
    fn evaluate_over_limit_floors_remaining_at_zero() {
        let check = LimitCheck::evaluate(Quota::Limited(3), 7);
        assert_eq!(check.remaining, Quota::Limited(0));
        assert!(!check.allowed);
    }

    #[test]
    fn unlimited_ignores_usage() {
        let check = LimitCheck::evaluate(Quota::Unlimited, 1_000_000);
        assert!(check.allowed);
        assert_eq!(check.remaining, Quota::Unlimited);
        assert_eq!(check.used, 0);
    }

    #[test]
    fn not_metered_is_zero_limit() {
        let check = LimitCheck::not_metered();
        assert!(!check.allowed);
        assert_eq!(check.limit, Quota::Limited(0));
    }
}
