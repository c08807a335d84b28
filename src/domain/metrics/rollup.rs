use serde::{Deserialize, Serialize};

use super::{DealRecord, DealStatus};
use crate::domain::foundation::Timestamp;

/// Persisted per-subscriber totals over all of their deals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMetrics {
    pub total_revenue: f64,
    pub active_deals: u32,
    pub avg_deal_value: f64,
    pub updated_at: Timestamp,
}

impl UserMetrics {
    /// Recomputes the rollup from every deal on record.
    ///
    /// Revenue counts completed deals only; the average is over those
    /// same deals and is zero when none are completed.
    pub fn from_deals(deals: &[DealRecord], now: Timestamp) -> Self {
        let active_deals = deals
            .iter()
            .filter(|d| d.status == DealStatus::Active)
            .count() as u32;
        let completed: Vec<f64> = deals
            .iter()
            .filter(|d| d.status == DealStatus::Completed)
            .map(|d| d.deal_value)
            .collect();
        let total_revenue = completed.iter().fold(0.0, |acc, v| acc + v);
        let avg_deal_value = if completed.is_empty() {
            0.0
        } else {
            total_revenue / completed.len() as f64
        };

        Self {
            total_revenue,
            active_deals,
            avg_deal_value,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(status: DealStatus, value: f64) -> DealRecord {
        DealRecord {
            status,
            deal_value: value,
            created_at: Timestamp::from_ymd(2021, 6, 1).unwrap(),
        }
    }

    #[test]
    fn rollup_counts_active_and_averages_completed() {
        let deals = vec![
            deal(DealStatus::Active, 900.0),
            deal(DealStatus::Active, 100.0),
            deal(DealStatus::Completed, 250.0),
            deal(DealStatus::Completed, 750.0),
            deal(DealStatus::Pending, 40.0),
        ];
        let metrics = UserMetrics::from_deals(&deals, Timestamp::now());
        assert_eq!(metrics.active_deals, 2);
        assert_eq!(metrics.total_revenue, 1000.0);
        assert_eq!(metrics.avg_deal_value, 500.0);
    }

    #[test]
    fn no_completed_deals_means_zero_average() {
        let metrics = UserMetrics::from_deals(&[deal(DealStatus::Active, 10.0)], Timestamp::now());
        assert_eq!(metrics.total_revenue, 0.0);
        assert!(metrics.total_revenue.is_sign_positive());
        let doc = serde_json::to_value(&metrics).unwrap();
        assert_eq!(doc["total_revenue"].to_string(), "0.0");
        assert_eq!(metrics.avg_deal_value, 0.0);
        assert_eq!(metrics.active_deals, 1);
    }
}
