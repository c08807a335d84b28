//! Lookback windows for metrics views.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

/// A caller-selected lookback window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricsPeriod {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
    #[serde(rename = "all")]
    AllTime,
}

impl MetricsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricsPeriod::Week => "7d",
            MetricsPeriod::Month => "30d",
            MetricsPeriod::Quarter => "90d",
            MetricsPeriod::Year => "1y",
            MetricsPeriod::AllTime => "all",
        }
    }

    /// Earliest instant included in the window ending at `now`.
    pub fn cutoff(&self, now: &Timestamp) -> Timestamp {
        match self {
            MetricsPeriod::Week => now.minus_days(7),
            MetricsPeriod::Month => now.minus_days(30),
            MetricsPeriod::Quarter => now.minus_days(90),
            MetricsPeriod::Year => now.minus_years(1),
            MetricsPeriod::AllTime => Timestamp::epoch(),
        }
    }
}

impl fmt::Display for MetricsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricsPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(MetricsPeriod::Week),
            "30d" => Ok(MetricsPeriod::Month),
            "90d" => Ok(MetricsPeriod::Quarter),
            "1y" => Ok(MetricsPeriod::Year),
            "all" => Ok(MetricsPeriod::AllTime),
            other => Err(ValidationError::unknown_value("period", other)),
        }
    }
}
