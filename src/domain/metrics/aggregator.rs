//! Period-bucketed metrics aggregation.

use super::{
    bucket, ApplicationStatus, ApplicationStatusCounts, DealStatus, DealStatusCounts,
    MetricsInput, MetricsPeriod, MetricsSummary, RevenueSeries,
};
use crate::domain::foundation::Timestamp;

/// Summarizes raw records over the period ending at `now`.
///
/// Pure: the same input, period, and `now` always produce the same
/// summary. Only `active_deals` bypasses the period filter.
pub fn summarize(input: &MetricsInput, period: MetricsPeriod, now: &Timestamp) -> MetricsSummary {
    let cutoff = period.cutoff(now);
    let in_window = |at: &Timestamp| !at.is_before(&cutoff);

    let mut revenue_series = RevenueSeries::zeroed(period);
    let mut total_revenue = 0.0;
    for record in input.revenue.iter().filter(|r| in_window(&r.received_at)) {
        total_revenue += record.amount;
        revenue_series.data[bucket::index(period, &record.received_at, now)] += record.amount;
    }

    let mut deal_status = DealStatusCounts::default();
    let mut completed_value = 0.0;
    for deal in input.deals.iter().filter(|d| in_window(&d.created_at)) {
        match deal.status {
            DealStatus::Active => deal_status.active += 1,
            DealStatus::Pending => deal_status.pending += 1,
            DealStatus::Completed => {
                deal_status.completed += 1;
                completed_value += deal.deal_value;
            }
            DealStatus::Cancelled => deal_status.cancelled += 1,
            DealStatus::Other => {}
        }
    }
    let avg_deal_value = if deal_status.completed > 0 {
        completed_value / f64::from(deal_status.completed)
    } else {
        0.0
    };

    let mut application_status = ApplicationStatusCounts::default();
    let mut applications_in_period = 0u32;
    for app in input.applications.iter().filter(|a| in_window(&a.created_at)) {
        applications_in_period += 1;
        match app.status {
            ApplicationStatus::Accepted => application_status.accepted += 1,
            ApplicationStatus::Pending => application_status.pending += 1,
            ApplicationStatus::Rejected => application_status.rejected += 1,
            ApplicationStatus::Other => {}
        }
    }

    MetricsSummary {
        period,
        total_revenue,
        active_deals: input.active_deals,
        avg_deal_value,
        acceptance_rate: acceptance_rate(application_status.accepted, applications_in_period),
        deal_status,
        application_status,
        revenue_series,
    }
}

/// `round(accepted / total * 100)`, zero when there were no applications.
pub fn acceptance_rate(accepted: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(accepted) / f64::from(total) * 100.0).round() as u32
}

#[cfg(test)]
#[path = "aggregator_test.rs"]
mod aggregator_test;
