//! Upsell and quota copy shown around gated features.

use super::feature::{Feature, SubFeature};
use super::{LimitCheck, MeteredFeature};

const GENERIC_UPGRADE: &str = "Unlock premium features to grow your creator business faster.";

/// Pitch shown in the upgrade prompt for a locked capability.
pub fn upgrade_message(feature: Feature, sub: Option<SubFeature>) -> &'static str {
    match (feature, sub) {
        (Feature::RateCalculator, Some(SubFeature::Save)) => {
            "Save and track your rates over time to optimize your pricing strategy."
        }
        (Feature::MediaKit, Some(SubFeature::Templates)) => {
            "Access all premium templates and custom color options."
        }
        (Feature::Marketplace, Some(SubFeature::QuickApply)) => {
            "Apply to unlimited brand deals each month."
        }
        (Feature::Analytics, Some(SubFeature::Export)) => {
            "Export your analytics data in CSV and PDF formats."
        }
        (Feature::Contracts, Some(SubFeature::Calendar)) => {
            "View your contracts in a beautiful calendar timeline."
        }
        (Feature::PitchGenerator, Some(SubFeature::Limit)) => {
            "Generate unlimited AI-powered pitches to close more deals."
        }
        _ => GENERIC_UPGRADE,
    }
}

/// Same as [`upgrade_message`] for raw names; unknown names get the
/// generic pitch.
pub fn upgrade_message_for(feature: &str, sub: Option<&str>) -> &'static str {
    let Some(feature) = Feature::from_name(feature) else {
        return GENERIC_UPGRADE;
    };
    match sub {
        None => upgrade_message(feature, None),
        Some(name) => match SubFeature::from_name(name) {
            Some(sub) => upgrade_message(feature, Some(sub)),
            None => GENERIC_UPGRADE,
        },
    }
}

/// "You've used X of Y ... this month." with an upgrade nudge once the
/// quota is exhausted.
pub fn limit_notice(feature: MeteredFeature, check: &LimitCheck) -> String {
    let mut notice = format!(
        "You've used {} of {} {} this month.",
        check.used,
        check.limit,
        feature.label()
    );
    if check.is_exhausted() {
        notice.push_str(" Upgrade to increase your limit!");
    }
    notice
}

impl MeteredFeature {
    /// Plural noun used in quota copy.
    pub fn label(&self) -> &'static str {
        match self {
            MeteredFeature::MediaKits => "media kits",
            MeteredFeature::QuickApplies => "quick applies",
            MeteredFeature::Pitches => "pitches",
            MeteredFeature::Contracts => "contracts",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::Quota;

    #[test]
    fn known_capability_gets_specific_copy() {
        assert_eq!(
            upgrade_message(Feature::Contracts, Some(SubFeature::Calendar)),
            "View your contracts in a beautiful calendar timeline."
        );
    }

    #[test]
    fn other_capabilities_fall_back_to_generic_copy() {
        assert_eq!(upgrade_message(Feature::Support, None), GENERIC_UPGRADE);
        assert_eq!(
            upgrade_message(Feature::MediaKit, Some(SubFeature::Shareable)),
            GENERIC_UPGRADE
        );
    }

    #[test]
    fn raw_names_resolve() {
        assert_eq!(
            upgrade_message_for("marketplace", Some("quickApply")),
            "Apply to unlimited brand deals each month."
        );
        assert_eq!(upgrade_message_for("teleporter", None), GENERIC_UPGRADE);
        assert_eq!(upgrade_message_for("analytics", Some("bogus")), GENERIC_UPGRADE);
    }

    #[test]
    fn notice_without_nudge_while_quota_remains() {
        let check = LimitCheck::evaluate(Quota::Limited(5), 2);
        assert_eq!(
            limit_notice(MeteredFeature::MediaKits, &check),
            "You've used 2 of 5 media kits this month."
        );
    }

    #[test]
    fn notice_nudges_when_exhausted() {
        let check = LimitCheck::evaluate(Quota::Limited(1), 1);
        let notice = limit_notice(MeteredFeature::Pitches, &check);
        assert!(notice.ends_with("Upgrade to increase your limit!"));
    }
}
