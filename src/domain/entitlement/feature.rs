//! Feature names, sub-features, and the value shapes a plan can assign them.
//!
//! Every feature name the UI can gate on maps to exactly one shape:
//! an on/off [`FeatureValue::Flag`], a count [`FeatureValue::Limit`], or a
//! leveled [`FeatureValue::Choice`]. The mapping is resolved by exhaustive
//! `match` in [`super::FeatureMap::resolve`], never by runtime key lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Quota;

/// Top-level feature areas of the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    RateCalculator,
    MediaKit,
    Marketplace,
    Filters,
    Analytics,
    Contracts,
    PitchGenerator,
    Notifications,
    Exports,
    Support,
}

impl Feature {
    const ALL: [Feature; 10] = [
        Feature::RateCalculator,
        Feature::MediaKit,
        Feature::Marketplace,
        Feature::Filters,
        Feature::Analytics,
        Feature::Contracts,
        Feature::PitchGenerator,
        Feature::Notifications,
        Feature::Exports,
        Feature::Support,
    ];

    pub fn all() -> &'static [Feature] {
        &Self::ALL
    }

    /// The name used by gated UI elements (`data-gated="mediaKit:templates"`).
    pub fn name(&self) -> &'static str {
        match self {
            Feature::RateCalculator => "rateCalculator",
            Feature::MediaKit => "mediaKit",
            Feature::Marketplace => "marketplace",
            Feature::Filters => "filters",
            Feature::Analytics => "analytics",
            Feature::Contracts => "contracts",
            Feature::PitchGenerator => "pitchGenerator",
            Feature::Notifications => "notifications",
            Feature::Exports => "exports",
            Feature::Support => "support",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Sub-features carried by this feature. Empty for leveled features
    /// such as `filters`, whose value is a single [`Choice`].
    pub fn sub_features(&self) -> &'static [SubFeature] {
        use SubFeature::*;
        match self {
            Feature::RateCalculator => &[Save, Compare, History],
            Feature::MediaKit => &[Limit, Templates, CustomColors, DragReorder, Shareable],
            Feature::Marketplace => &[QuickApply, SaveFavorites, PriorityMatches],
            Feature::Analytics => &[Days, Export, Roi],
            Feature::Contracts => &[Limit, Reminders, AutoMilestones, Calendar],
            Feature::PitchGenerator => &[Limit, PremiumTemplates, AutoAttach],
            Feature::Filters | Feature::Notifications | Feature::Exports | Feature::Support => &[],
        }
    }

    pub fn is_leveled(&self) -> bool {
        self.sub_features().is_empty()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Nested capability keys within a feature area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubFeature {
    Save,
    Compare,
    History,
    Limit,
    Templates,
    CustomColors,
    DragReorder,
    Shareable,
    QuickApply,
    SaveFavorites,
    PriorityMatches,
    Days,
    Export,
    Roi,
    Reminders,
    AutoMilestones,
    Calendar,
    PremiumTemplates,
    AutoAttach,
}

impl SubFeature {
    const ALL: [SubFeature; 19] = [
        SubFeature::Save,
        SubFeature::Compare,
        SubFeature::History,
        SubFeature::Limit,
        SubFeature::Templates,
        SubFeature::CustomColors,
        SubFeature::DragReorder,
        SubFeature::Shareable,
        SubFeature::QuickApply,
        SubFeature::SaveFavorites,
        SubFeature::PriorityMatches,
        SubFeature::Days,
        SubFeature::Export,
        SubFeature::Roi,
        SubFeature::Reminders,
        SubFeature::AutoMilestones,
        SubFeature::Calendar,
        SubFeature::PremiumTemplates,
        SubFeature::AutoAttach,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SubFeature::Save => "save",
            SubFeature::Compare => "compare",
            SubFeature::History => "history",
            SubFeature::Limit => "limit",
            SubFeature::Templates => "templates",
            SubFeature::CustomColors => "customColors",
            SubFeature::DragReorder => "dragReorder",
            SubFeature::Shareable => "shareable",
            SubFeature::QuickApply => "quickApply",
            SubFeature::SaveFavorites => "saveFavorites",
            SubFeature::PriorityMatches => "priorityMatches",
            SubFeature::Days => "days",
            SubFeature::Export => "export",
            SubFeature::Roi => "roi",
            SubFeature::Reminders => "reminders",
            SubFeature::AutoMilestones => "autoMilestones",
            SubFeature::Calendar => "calendar",
            SubFeature::PremiumTemplates => "premiumTemplates",
            SubFeature::AutoAttach => "autoAttach",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }
}

impl fmt::Display for SubFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Media kit template library access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateAccess {
    Basic,
    All,
}

/// Marketplace search filter sophistication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterLevel {
    Basic,
    Standard,
    Advanced,
}

/// Analytics export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormats {
    None,
    Csv,
    /// CSV and PDF.
    Both,
}

/// Contract reminder delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderChannels {
    None,
    Email,
    /// Email and in-app.
    Both,
}

/// Notification delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannels {
    Basic,
    Email,
    Both,
}

/// Quality of exported documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuality {
    Watermarked,
    Clean,
    Branded,
}

/// Support channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportLevel {
    Community,
    Email,
    Priority,
}

/// A leveled (string-enum) feature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Choice {
    Templates(TemplateAccess),
    Filters(FilterLevel),
    AnalyticsExport(ExportFormats),
    Reminders(ReminderChannels),
    Notifications(NotificationChannels),
    Exports(ExportQuality),
    Support(SupportLevel),
}

impl Choice {
    /// Position of the level within its own scale, lowest = 0.
    pub fn rank(&self) -> u8 {
        match self {
            Choice::Templates(v) => *v as u8,
            Choice::Filters(v) => *v as u8,
            Choice::AnalyticsExport(v) => *v as u8,
            Choice::Reminders(v) => *v as u8,
            Choice::Notifications(v) => *v as u8,
            Choice::Exports(v) => *v as u8,
            Choice::Support(v) => *v as u8,
        }
    }

    /// Only the explicit "none" levels switch a capability off.
    pub fn is_enabled(&self) -> bool {
        !matches!(
            self,
            Choice::AnalyticsExport(ExportFormats::None) | Choice::Reminders(ReminderChannels::None)
        )
    }

    fn same_scale(&self, other: &Choice) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// The value a plan assigns to one capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Limit(Quota),
    Choice(Choice),
}

impl FeatureValue {
    /// Truthiness used by feature gates.
    pub fn is_granted(&self) -> bool {
        match self {
            FeatureValue::Flag(on) => *on,
            FeatureValue::Limit(quota) => quota.is_granted(),
            FeatureValue::Choice(choice) => choice.is_enabled(),
        }
    }

    /// Whether `self` grants at least as much as `other`.
    ///
    /// Returns `None` when the two values have different shapes.
    pub fn covers(&self, other: &FeatureValue) -> Option<bool> {
        match (self, other) {
            (FeatureValue::Flag(a), FeatureValue::Flag(b)) => Some(a >= b),
            (FeatureValue::Limit(a), FeatureValue::Limit(b)) => Some(a >= b),
            (FeatureValue::Choice(a), FeatureValue::Choice(b)) if a.same_scale(b) => {
                Some(a.rank() >= b.rank())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_names_round_trip() {
        for feature in Feature::all() {
            assert_eq!(Feature::from_name(feature.name()), Some(*feature));
        }
        assert_eq!(Feature::from_name("teleporter"), None);
    }

    #[test]
    fn sub_feature_names_round_trip() {
        assert_eq!(SubFeature::from_name("customColors"), Some(SubFeature::CustomColors));
        assert_eq!(SubFeature::from_name("custom_colors"), None);
    }

    #[test]
    fn leveled_features_have_no_sub_features() {
        assert!(Feature::Filters.is_leveled());
        assert!(!Feature::MediaKit.is_leveled());
    }

    #[test]
    fn none_levels_are_not_granted() {
        assert!(!FeatureValue::Choice(Choice::AnalyticsExport(ExportFormats::None)).is_granted());
        assert!(FeatureValue::Choice(Choice::AnalyticsExport(ExportFormats::Csv)).is_granted());
        assert!(FeatureValue::Choice(Choice::Filters(FilterLevel::Basic)).is_granted());
    }

    #[test]
    fn covers_compares_within_a_shape() {
        let csv = FeatureValue::Choice(Choice::AnalyticsExport(ExportFormats::Csv));
        let both = FeatureValue::Choice(Choice::AnalyticsExport(ExportFormats::Both));
        assert_eq!(both.covers(&csv), Some(true));
        assert_eq!(csv.covers(&both), Some(false));
        assert_eq!(FeatureValue::Flag(true).covers(&FeatureValue::Flag(false)), Some(true));
    }

    #[test]
    fn covers_rejects_mismatched_shapes() {
        let flag = FeatureValue::Flag(true);
        let limit = FeatureValue::Limit(Quota::Limited(1));
        assert_eq!(flag.covers(&limit), None);
        let filters = FeatureValue::Choice(Choice::Filters(FilterLevel::Basic));
        let support = FeatureValue::Choice(Choice::Support(SupportLevel::Community));
        assert_eq!(filters.covers(&support), None);
    }
}
