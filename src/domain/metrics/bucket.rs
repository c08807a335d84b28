//! Fixed label sets and bucket assignment for the revenue series.
//!
//! The label set of a period never changes with the input, so the chart
//! axis can be hardcoded by the display layer.

use super::MetricsPeriod;
use crate::domain::foundation::Timestamp;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const WEEKS: [&str; 4] = ["Week 1", "Week 2", "Week 3", "Week 4"];
const MONTHS: [&str; 3] = ["Month 1", "Month 2", "Month 3"];
const CALENDAR_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Labels of the revenue series for a period, oldest bucket first.
pub fn labels(period: MetricsPeriod) -> &'static [&'static str] {
    match period {
        MetricsPeriod::Week => &WEEKDAYS,
        MetricsPeriod::Month => &WEEKS,
        MetricsPeriod::Quarter => &MONTHS,
        MetricsPeriod::Year | MetricsPeriod::AllTime => &CALENDAR_MONTHS,
    }
}

/// Bucket index of a record dated `at`, relative to `now`.
///
/// The 7-day view buckets by weekday, so anything older than a week that
/// still reaches the aggregator aliases onto the same weekday as recent
/// records. The year and all-time views fold every year onto Jan..Dec.
pub fn index(period: MetricsPeriod, at: &Timestamp, now: &Timestamp) -> usize {
    match period {
        MetricsPeriod::Week => at.weekday_from_monday() as usize,
        MetricsPeriod::Month => reversed(at.days_before(now) / 7, WEEKS.len()),
        MetricsPeriod::Quarter => reversed(at.days_before(now) / 30, MONTHS.len()),
        MetricsPeriod::Year | MetricsPeriod::AllTime => (at.month() - 1) as usize,
    }
}

/// Clamps an age-based slot and flips it so the newest slot is last.
fn reversed(slot: i64, len: usize) -> usize {
    let clamped = (slot.max(0) as usize).min(len - 1);
    len - 1 - clamped
}
