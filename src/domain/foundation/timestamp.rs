//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// The Unix epoch, used as the "beginning of time" cutoff.
    pub fn epoch() -> Self {
        Self(DateTime::<Utc>::default())
    }

    /// Creates a timestamp at midnight UTC on the given calendar date.
    ///
    /// Returns `None` for dates that do not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .map(Self)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Whole days elapsed from this timestamp until `now`.
    ///
    /// Timestamps in the future count as zero days ago.
    pub fn days_before(&self, now: &Timestamp) -> i64 {
        now.duration_since(self).num_days().max(0)
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Creates a new timestamp by adding the specified number of days.
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by subtracting calendar years.
    ///
    /// Feb 29 clamps to Feb 28; falls back to 365-day years if the
    /// calendar arithmetic overflows.
    pub fn minus_years(&self, years: u32) -> Self {
        self.0
            .checked_sub_months(Months::new(years * 12))
            .map(Self)
            .unwrap_or_else(|| self.minus_days(365 * years as i64))
    }

    /// Calendar year of this timestamp.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Calendar month (1-12) of this timestamp.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of week, Monday = 0 through Sunday = 6.
    pub fn weekday_from_monday(&self) -> u32 {
        self.0.weekday().num_days_from_monday()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
