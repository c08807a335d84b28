use serde::{Deserialize, Serialize};

use super::{bucket, MetricsPeriod};

/// The dashboard's metrics view for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub period: MetricsPeriod,
    /// Sum of revenue received in the period.
    pub total_revenue: f64,
    /// Current active deals, regardless of period.
    pub active_deals: u32,
    /// Mean value of deals completed in the period.
    pub avg_deal_value: f64,
    /// Accepted applications as a rounded percentage (0-100).
    pub acceptance_rate: u32,
    pub deal_status: DealStatusCounts,
    pub application_status: ApplicationStatusCounts,
    pub revenue_series: RevenueSeries,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealStatusCounts {
    pub active: u32,
    pub pending: u32,
    pub completed: u32,
    pub cancelled: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStatusCounts {
    pub accepted: u32,
    pub pending: u32,
    pub rejected: u32,
}

impl ApplicationStatusCounts {
    pub fn total(&self) -> u32 {
        self.accepted + self.pending + self.rejected
    }
}

/// Ordered labels with a parallel value per label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

impl RevenueSeries {
    /// The zero-filled series for a period.
    pub fn zeroed(period: MetricsPeriod) -> Self {
        let labels = bucket::labels(period);
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            data: vec![0.0; labels.len()],
        }
    }
}

impl MetricsSummary {
    /// The zero-valued summary shown when there is nothing to report.
    pub fn empty(period: MetricsPeriod) -> Self {
        Self {
            period,
            total_revenue: 0.0,
            active_deals: 0,
            avg_deal_value: 0.0,
            acceptance_rate: 0,
            deal_status: DealStatusCounts::default(),
            application_status: ApplicationStatusCounts::default(),
            revenue_series: RevenueSeries::zeroed(period),
        }
    }
}
