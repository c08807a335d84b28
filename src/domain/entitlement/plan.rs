//! The plan catalog: what each tier includes.
//!
//! Plans are process-wide static configuration, built once on first use
//! and never mutated.

use once_cell::sync::Lazy;
use serde::Serialize;

use super::feature::{
    Choice, ExportFormats, ExportQuality, Feature, FeatureValue, FilterLevel,
    NotificationChannels, ReminderChannels, SubFeature, SupportLevel, TemplateAccess,
};
use super::{PlanTier, Quota};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCalculatorFeatures {
    pub save: bool,
    pub compare: bool,
    pub history: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaKitFeatures {
    pub limit: Quota,
    pub templates: TemplateAccess,
    pub custom_colors: bool,
    pub drag_reorder: bool,
    pub shareable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceFeatures {
    pub quick_apply: Quota,
    pub save_favorites: bool,
    pub priority_matches: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsFeatures {
    /// History window in days.
    pub days: Quota,
    pub export: ExportFormats,
    pub roi: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractFeatures {
    pub limit: Quota,
    pub reminders: ReminderChannels,
    pub auto_milestones: bool,
    pub calendar: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchGeneratorFeatures {
    pub limit: Quota,
    pub premium_templates: bool,
    pub auto_attach: bool,
}

/// Everything a tier grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureMap {
    pub rate_calculator: RateCalculatorFeatures,
    pub media_kit: MediaKitFeatures,
    pub marketplace: MarketplaceFeatures,
    pub filters: FilterLevel,
    pub analytics: AnalyticsFeatures,
    pub contracts: ContractFeatures,
    pub pitch_generator: PitchGeneratorFeatures,
    pub notifications: NotificationChannels,
    pub exports: ExportQuality,
    pub support: SupportLevel,
}

impl FeatureMap {
    /// Resolves one capability to its value.
    ///
    /// `sub` must be `None` for leveled features and `Some` for grouped
    /// ones; any other combination, or a sub-feature the area does not
    /// carry, resolves to `None`.
    pub fn resolve(&self, feature: Feature, sub: Option<SubFeature>) -> Option<FeatureValue> {
        use FeatureValue::{Flag, Limit};
        use SubFeature as S;

        let value = match (feature, sub) {
            (Feature::Filters, None) => FeatureValue::Choice(Choice::Filters(self.filters)),
            (Feature::Notifications, None) => {
                FeatureValue::Choice(Choice::Notifications(self.notifications))
            }
            (Feature::Exports, None) => FeatureValue::Choice(Choice::Exports(self.exports)),
            (Feature::Support, None) => FeatureValue::Choice(Choice::Support(self.support)),

            (Feature::RateCalculator, Some(S::Save)) => Flag(self.rate_calculator.save),
            (Feature::RateCalculator, Some(S::Compare)) => Flag(self.rate_calculator.compare),
            (Feature::RateCalculator, Some(S::History)) => Flag(self.rate_calculator.history),

            (Feature::MediaKit, Some(S::Limit)) => Limit(self.media_kit.limit),
            (Feature::MediaKit, Some(S::Templates)) => {
                FeatureValue::Choice(Choice::Templates(self.media_kit.templates))
            }
            (Feature::MediaKit, Some(S::CustomColors)) => Flag(self.media_kit.custom_colors),
            (Feature::MediaKit, Some(S::DragReorder)) => Flag(self.media_kit.drag_reorder),
            (Feature::MediaKit, Some(S::Shareable)) => Flag(self.media_kit.shareable),

            (Feature::Marketplace, Some(S::QuickApply)) => Limit(self.marketplace.quick_apply),
            (Feature::Marketplace, Some(S::SaveFavorites)) => {
                Flag(self.marketplace.save_favorites)
            }
            (Feature::Marketplace, Some(S::PriorityMatches)) => {
                Flag(self.marketplace.priority_matches)
            }

            (Feature::Analytics, Some(S::Days)) => Limit(self.analytics.days),
            (Feature::Analytics, Some(S::Export)) => {
                FeatureValue::Choice(Choice::AnalyticsExport(self.analytics.export))
            }
            (Feature::Analytics, Some(S::Roi)) => Flag(self.analytics.roi),

            (Feature::Contracts, Some(S::Limit)) => Limit(self.contracts.limit),
            (Feature::Contracts, Some(S::Reminders)) => {
                FeatureValue::Choice(Choice::Reminders(self.contracts.reminders))
            }
            (Feature::Contracts, Some(S::AutoMilestones)) => Flag(self.contracts.auto_milestones),
            (Feature::Contracts, Some(S::Calendar)) => Flag(self.contracts.calendar),

            (Feature::PitchGenerator, Some(S::Limit)) => Limit(self.pitch_generator.limit),
            (Feature::PitchGenerator, Some(S::PremiumTemplates)) => {
                Flag(self.pitch_generator.premium_templates)
            }
            (Feature::PitchGenerator, Some(S::AutoAttach)) => Flag(self.pitch_generator.auto_attach),

            _ => return None,
        };
        Some(value)
    }

    /// Whether the capability is granted.
    ///
    /// A feature area on its own is always present in the catalog; with a
    /// sub-feature the nested value decides. Anything unresolvable is denied.
    pub fn grants(&self, feature: Feature, sub: Option<SubFeature>) -> bool {
        match sub {
            None => true,
            Some(_) => self
                .resolve(feature, sub)
                .map(|v| v.is_granted())
                .unwrap_or(false),
        }
    }
}

/// A subscription plan: tier identity, pricing, and feature map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub tier: PlanTier,
    pub name: &'static str,
    /// Monthly price in cents.
    pub monthly_price_cents: u32,
    /// Annual price in cents, for tiers billed annually.
    pub annual_price_cents: Option<u32>,
    pub features: FeatureMap,
}

/// Header badge shown next to the profile menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBadge {
    pub plan_name: &'static str,
    /// The top tier is rendered with the accent gradient.
    pub highlighted: bool,
    pub show_upgrade: bool,
}

static CATALOG: Lazy<[Plan; 3]> = Lazy::new(|| {
    [
        Plan {
            tier: PlanTier::Free,
            name: PlanTier::Free.display_name(),
            monthly_price_cents: 0,
            annual_price_cents: None,
            features: FeatureMap {
                rate_calculator: RateCalculatorFeatures {
                    save: false,
                    compare: false,
                    history: false,
                },
                media_kit: MediaKitFeatures {
                    limit: Quota::Limited(1),
                    templates: TemplateAccess::Basic,
                    custom_colors: false,
                    drag_reorder: false,
                    shareable: false,
                },
                marketplace: MarketplaceFeatures {
                    quick_apply: Quota::Limited(0),
                    save_favorites: false,
                    priority_matches: false,
                },
                filters: FilterLevel::Basic,
                analytics: AnalyticsFeatures {
                    days: Quota::Limited(30),
                    export: ExportFormats::None,
                    roi: false,
                },
                contracts: ContractFeatures {
                    limit: Quota::Limited(3),
                    reminders: ReminderChannels::None,
                    auto_milestones: false,
                    calendar: false,
                },
                pitch_generator: PitchGeneratorFeatures {
                    limit: Quota::Limited(1),
                    premium_templates: false,
                    auto_attach: false,
                },
                notifications: NotificationChannels::Basic,
                exports: ExportQuality::Watermarked,
                support: SupportLevel::Community,
            },
        },
        Plan {
            tier: PlanTier::Starter,
            name: PlanTier::Starter.display_name(),
            monthly_price_cents: 499,
            annual_price_cents: Some(4790),
            features: FeatureMap {
                rate_calculator: RateCalculatorFeatures {
                    save: true,
                    compare: true,
                    history: false,
                },
                media_kit: MediaKitFeatures {
                    limit: Quota::Limited(5),
                    templates: TemplateAccess::All,
                    custom_colors: true,
                    drag_reorder: false,
                    shareable: false,
                },
                marketplace: MarketplaceFeatures {
                    quick_apply: Quota::Limited(10),
                    save_favorites: true,
                    priority_matches: false,
                },
                filters: FilterLevel::Standard,
                analytics: AnalyticsFeatures {
                    days: Quota::Limited(90),
                    export: ExportFormats::Csv,
                    roi: false,
                },
                contracts: ContractFeatures {
                    limit: Quota::Limited(10),
                    reminders: ReminderChannels::Email,
                    auto_milestones: false,
                    calendar: false,
                },
                pitch_generator: PitchGeneratorFeatures {
                    limit: Quota::Limited(10),
                    premium_templates: false,
                    auto_attach: false,
                },
                notifications: NotificationChannels::Email,
                exports: ExportQuality::Clean,
                support: SupportLevel::Email,
            },
        },
        Plan {
            tier: PlanTier::Pro,
            name: PlanTier::Pro.display_name(),
            monthly_price_cents: 999,
            annual_price_cents: Some(9590),
            features: FeatureMap {
                rate_calculator: RateCalculatorFeatures {
                    save: true,
                    compare: true,
                    history: true,
                },
                media_kit: MediaKitFeatures {
                    limit: Quota::Unlimited,
                    templates: TemplateAccess::All,
                    custom_colors: true,
                    drag_reorder: true,
                    shareable: true,
                },
                marketplace: MarketplaceFeatures {
                    quick_apply: Quota::Unlimited,
                    save_favorites: true,
                    priority_matches: true,
                },
                filters: FilterLevel::Advanced,
                analytics: AnalyticsFeatures {
                    days: Quota::Unlimited,
                    export: ExportFormats::Both,
                    roi: true,
                },
                contracts: ContractFeatures {
                    limit: Quota::Unlimited,
                    reminders: ReminderChannels::Both,
                    auto_milestones: true,
                    calendar: true,
                },
                pitch_generator: PitchGeneratorFeatures {
                    limit: Quota::Unlimited,
                    premium_templates: true,
                    auto_attach: true,
                },
                notifications: NotificationChannels::Both,
                exports: ExportQuality::Branded,
                support: SupportLevel::Priority,
            },
        },
    ]
});

impl Plan {
    /// Get the plan for a specific tier.
    ///
    /// # Catalog
    ///
    /// | Tier | Media kits | Quick applies | Contracts | Pitches | Price |
    /// |------|-----------|---------------|-----------|---------|-------|
    /// | Free | 1 | 0 | 3 | 1 | $0 |
    /// | Starter | 5 | 10 | 10 | 10 | $4.99 |
    /// | Pro | Unlimited | Unlimited | Unlimited | Unlimited | $9.99 |
    pub fn for_tier(tier: PlanTier) -> &'static Plan {
        &CATALOG[tier.rank() as usize]
    }

    /// All plans, lowest tier first.
    pub fn all() -> &'static [Plan] {
        CATALOG.as_slice()
    }

    /// Lowest tier granting the capability, if any tier does.
    pub fn required_tier(feature: Feature, sub: Option<SubFeature>) -> Option<PlanTier> {
        Self::all()
            .iter()
            .find(|plan| plan.features.grants(feature, sub))
            .map(|plan| plan.tier)
    }

    pub fn badge(&self) -> PlanBadge {
        PlanBadge {
            plan_name: self.name,
            highlighted: self.tier.is_top(),
            show_upgrade: !self.tier.is_top(),
        }
    }
}
