//! Raw records the aggregator consumes, as stored by the data layer.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::Timestamp;

/// Lifecycle status of a brand deal (contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Active,
    Pending,
    Completed,
    Cancelled,
    /// Any status the breakdown does not track.
    #[serde(other)]
    Other,
}

/// Outcome of a marketplace application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Accepted,
    Pending,
    Rejected,
    #[serde(other)]
    Other,
}

/// A row of the `contracts` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    pub status: DealStatus,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub deal_value: f64,
    pub created_at: Timestamp,
}

/// A row of the `applications` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub status: ApplicationStatus,
    pub created_at: Timestamp,
}

/// A row of the `revenue` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    pub received_at: Timestamp,
}

/// Money columns arrive as numbers, as decimal strings (`numeric` columns
/// over a REST layer) or as null. Null counts as zero; any other string
/// that is not a finite number is rejected.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Amount::Number(n)) => Ok(n),
        Some(Amount::Text(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount '{}'", s))),
    }
}

/// Everything one summary is computed from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsInput {
    pub deals: Vec<DealRecord>,
    pub applications: Vec<ApplicationRecord>,
    pub revenue: Vec<RevenueRecord>,
    /// The subscriber's current active deal count, as persisted.
    pub active_deals: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_statuses_decode_as_other() {
        let deal: DealRecord = serde_json::from_str(
            r#"{"status":"draft","deal_value":100,"created_at":"2024-01-01T00:00:00Z","id":"x"}"#,
        )
        .unwrap();
        assert_eq!(deal.status, DealStatus::Other);

        let app: ApplicationRecord =
            serde_json::from_str(r#"{"status":"withdrawn","created_at":"2024-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(app.status, ApplicationStatus::Other);
    }

    #[test]
    fn missing_deal_value_defaults_to_zero() {
        let deal: DealRecord =
            serde_json::from_str(r#"{"status":"active","created_at":"2024-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(deal.deal_value, 0.0);
    }

    #[test]
    fn null_deal_value_counts_as_zero() {
        let deal: DealRecord = serde_json::from_str(
            r#"{"status":"active","deal_value":null,"created_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(deal.status, DealStatus::Active);
        assert_eq!(deal.deal_value, 0.0);
    }

    #[test]
    fn decimal_strings_are_parsed() {
        let deal: DealRecord = serde_json::from_str(
            r#"{"status":"completed","deal_value":"250.00","created_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(deal.deal_value, 250.0);

        let payment: RevenueRecord =
            serde_json::from_str(r#"{"amount":" 99.50","received_at":"2024-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(payment.amount, 99.5);
    }

    #[test]
    fn non_numeric_amounts_are_rejected() {
        let result: Result<RevenueRecord, _> =
            serde_json::from_str(r#"{"amount":"lots","received_at":"2024-01-01T00:00:00Z"}"#);
        assert!(result.is_err());

        let result: Result<DealRecord, _> = serde_json::from_str(
            r#"{"status":"active","deal_value":"NaN","created_at":"2024-01-01T00:00:00Z"}"#,
        );
        assert!(result.is_err());
    }
}
