//! Plan tier definitions.
//!
//! Represents the subscription levels available in PromoSync.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Subscription plan tier.
///
/// Determines feature access, monthly usage limits, and pricing.
/// Variants are declared in capability order so `Ord` follows upgrades.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Free tier - one media kit, three contracts, no quick applies.
    #[default]
    Free,

    /// Starter tier ($4.99/mo) - higher quotas, CSV export, email reminders.
    Starter,

    /// Pro tier ($9.99/mo) - unlimited quotas and every capability.
    Pro,
}

impl PlanTier {
    const ALL: [PlanTier; 3] = [PlanTier::Free, PlanTier::Starter, PlanTier::Pro];

    /// All tiers, lowest first.
    pub fn all() -> &'static [PlanTier] {
        &Self::ALL
    }

    /// Stable identifier as stored in the subscriber profile.
    pub fn id(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Starter => "starter",
            PlanTier::Pro => "pro",
        }
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Starter => "Starter",
            PlanTier::Pro => "Pro",
        }
    }

    /// Returns the numeric rank of this tier for comparison.
    ///
    /// Higher rank = more features.
    pub fn rank(&self) -> u8 {
        match self {
            PlanTier::Free => 0,
            PlanTier::Starter => 1,
            PlanTier::Pro => 2,
        }
    }

    /// Returns true if this tier is a paid tier.
    pub fn is_paid(&self) -> bool {
        !matches!(self, PlanTier::Free)
    }

    /// Returns true if this is the top tier (no upgrade prompt).
    pub fn is_top(&self) -> bool {
        matches!(self, PlanTier::Pro)
    }

    /// Tiers a subscriber on this tier could upgrade to.
    pub fn upgrades(&self) -> impl Iterator<Item = PlanTier> + '_ {
        Self::ALL.iter().copied().filter(move |t| t > self)
    }

    /// Resolves a stored tier identifier, falling back to Free when the
    /// value is missing or unrecognized.
    pub fn from_id_or_default(id: Option<&str>) -> Self {
        id.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for PlanTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "starter" => Ok(PlanTier::Starter),
            "pro" => Ok(PlanTier::Pro),
            other => Err(ValidationError::unknown_value("tier", other)),
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
