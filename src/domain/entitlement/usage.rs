//! Monthly usage counters for metered features.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::feature::{Feature, SubFeature};
use super::{FeatureMap, Quota};
use crate::domain::foundation::{Timestamp, ValidationError};

/// Calendar month a usage counter set applies to.
///
/// Rendered as `year-month` with an unpadded month (`2024-1`), which is
/// the format already stored for existing subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::invalid_format(
                "month",
                format!("month {} out of range 1-12", month),
            ));
        }
        Ok(Self { year, month })
    }

    /// The month containing the given instant (UTC).
    pub fn of(ts: &Timestamp) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ValidationError::invalid_format("month", "expected year-month"))?;
        let year = year
            .parse::<i32>()
            .map_err(|e| ValidationError::invalid_format("month", e.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|e| ValidationError::invalid_format("month", e.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Features whose use is counted against a monthly quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeteredFeature {
    MediaKits,
    QuickApplies,
    Pitches,
    Contracts,
}

impl MeteredFeature {
    const ALL: [MeteredFeature; 4] = [
        MeteredFeature::MediaKits,
        MeteredFeature::QuickApplies,
        MeteredFeature::Pitches,
        MeteredFeature::Contracts,
    ];

    pub fn all() -> &'static [MeteredFeature] {
        &Self::ALL
    }

    /// Key of this counter in the stored usage document.
    pub fn usage_key(&self) -> &'static str {
        match self {
            MeteredFeature::MediaKits => "mediaKits",
            MeteredFeature::QuickApplies => "quickApplies",
            MeteredFeature::Pitches => "pitches",
            MeteredFeature::Contracts => "contracts",
        }
    }

    /// The catalog capability that carries this feature's quota.
    pub fn capability(&self) -> (Feature, SubFeature) {
        match self {
            MeteredFeature::MediaKits => (Feature::MediaKit, SubFeature::Limit),
            MeteredFeature::QuickApplies => (Feature::Marketplace, SubFeature::QuickApply),
            MeteredFeature::Pitches => (Feature::PitchGenerator, SubFeature::Limit),
            MeteredFeature::Contracts => (Feature::Contracts, SubFeature::Limit),
        }
    }

    /// This feature's monthly quota under a feature map.
    pub fn quota(&self, features: &FeatureMap) -> Quota {
        match self {
            MeteredFeature::MediaKits => features.media_kit.limit,
            MeteredFeature::QuickApplies => features.marketplace.quick_apply,
            MeteredFeature::Pitches => features.pitch_generator.limit,
            MeteredFeature::Contracts => features.contracts.limit,
        }
    }

    /// Accepts either the usage key (`mediaKits`) or the owning feature
    /// area's name (`mediaKit`, `pitchGenerator`, `marketplace`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| {
            m.usage_key() == name || m.capability().0.name() == name
        })
    }
}

impl fmt::Display for MeteredFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.usage_key())
    }
}

/// Per-subscriber counts of metered actions for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounters {
    pub month: MonthKey,
    #[serde(default)]
    pub media_kits: u32,
    #[serde(default)]
    pub quick_applies: u32,
    #[serde(default)]
    pub pitches: u32,
    #[serde(default)]
    pub contracts: u32,
}

impl UsageCounters {
    /// A zeroed counter set stamped with `month`.
    pub fn fresh(month: MonthKey) -> Self {
        Self {
            month,
            media_kits: 0,
            quick_applies: 0,
            pitches: 0,
            contracts: 0,
        }
    }

    pub fn get(&self, feature: MeteredFeature) -> u32 {
        match feature {
            MeteredFeature::MediaKits => self.media_kits,
            MeteredFeature::QuickApplies => self.quick_applies,
            MeteredFeature::Pitches => self.pitches,
            MeteredFeature::Contracts => self.contracts,
        }
    }

    fn slot(&mut self, feature: MeteredFeature) -> &mut u32 {
        match feature {
            MeteredFeature::MediaKits => &mut self.media_kits,
            MeteredFeature::QuickApplies => &mut self.quick_applies,
            MeteredFeature::Pitches => &mut self.pitches,
            MeteredFeature::Contracts => &mut self.contracts,
        }
    }

    /// Adds one use; returns the new count.
    pub fn increment(&mut self, feature: MeteredFeature) -> u32 {
        let slot = self.slot(feature);
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn is_current(&self, month: MonthKey) -> bool {
        self.month == month
    }

    /// Replaces the whole set with a zeroed one if it belongs to another
    /// month. Returns true if a reset happened.
    pub fn roll_over(&mut self, current: MonthKey) -> bool {
        if self.is_current(current) {
            return false;
        }
        *self = Self::fresh(current);
        true
    }
}
