//! Core types for the Insight Generator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which rule of the insight cascade produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// No readings recorded yet
    Onboarding,
    /// Only one reading, not enough for trends
    NeedMoreData,
    LatestLow,
    LatestHigh,
    /// Latest reading between 140 and 180
    LatestElevated,
    AverageLow,
    AverageHigh,
    /// Average between 100 and 110
    ExcellentControl,
    /// Average between 80 and 100
    GreatControl,
    /// Spread of recent readings above 100 mg/dL
    HighVariability,
    ElevatedFasting,
    FastingOnTarget,
    PostMealHigh,
    /// Last 7 readings all in range
    InRangeStreak,
    /// Last 5 readings no more than a day apart
    ConsistentTracking,
    /// Fallback encouragement
    KeepTracking,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Onboarding => "onboarding",
            InsightKind::NeedMoreData => "need_more_data",
            InsightKind::LatestLow => "latest_low",
            InsightKind::LatestHigh => "latest_high",
            InsightKind::LatestElevated => "latest_elevated",
            InsightKind::AverageLow => "average_low",
            InsightKind::AverageHigh => "average_high",
            InsightKind::ExcellentControl => "excellent_control",
            InsightKind::GreatControl => "great_control",
            InsightKind::HighVariability => "high_variability",
            InsightKind::ElevatedFasting => "elevated_fasting",
            InsightKind::FastingOnTarget => "fasting_on_target",
            InsightKind::PostMealHigh => "post_meal_high",
            InsightKind::InRangeStreak => "in_range_streak",
            InsightKind::ConsistentTracking => "consistent_tracking",
            InsightKind::KeepTracking => "keep_tracking",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            InsightKind::LatestLow | InsightKind::LatestHigh => Severity::Warning,
            InsightKind::LatestElevated
            | InsightKind::AverageLow
            | InsightKind::AverageHigh
            | InsightKind::HighVariability
            | InsightKind::ElevatedFasting
            | InsightKind::PostMealHigh => Severity::Attention,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onboarding" => Ok(InsightKind::Onboarding),
            "need_more_data" => Ok(InsightKind::NeedMoreData),
            "latest_low" => Ok(InsightKind::LatestLow),
            "latest_high" => Ok(InsightKind::LatestHigh),
            "latest_elevated" => Ok(InsightKind::LatestElevated),
            "average_low" => Ok(InsightKind::AverageLow),
            "average_high" => Ok(InsightKind::AverageHigh),
            "excellent_control" => Ok(InsightKind::ExcellentControl),
            "great_control" => Ok(InsightKind::GreatControl),
            "high_variability" => Ok(InsightKind::HighVariability),
            "elevated_fasting" => Ok(InsightKind::ElevatedFasting),
            "fasting_on_target" => Ok(InsightKind::FastingOnTarget),
            "post_meal_high" => Ok(InsightKind::PostMealHigh),
            "in_range_streak" => Ok(InsightKind::InRangeStreak),
            "consistent_tracking" => Ok(InsightKind::ConsistentTracking),
            "keep_tracking" => Ok(InsightKind::KeepTracking),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// How much attention an insight deserves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational or encouraging
    Info,
    /// Worth reviewing with habits or a doctor
    Attention,
    /// Act on the latest reading now
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single message selected by the insight cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    pub message: String,
}

impl Insight {
    pub fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }
}

/// Which rule of the weekly comparison produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyKind {
    /// Fewer than two readings overall
    TooLittleData,
    NoDataThisWeek,
    NoPreviousWeek,
    AverageRose,
    AverageImproved,
    FrequentHighFasting,
    FrequentPostMealSpikes,
    FrequentLows,
    /// At least 7 readings this week
    StableWellTracked,
    Stable,
}

impl WeeklyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeeklyKind::TooLittleData => "too_little_data",
            WeeklyKind::NoDataThisWeek => "no_data_this_week",
            WeeklyKind::NoPreviousWeek => "no_previous_week",
            WeeklyKind::AverageRose => "average_rose",
            WeeklyKind::AverageImproved => "average_improved",
            WeeklyKind::FrequentHighFasting => "frequent_high_fasting",
            WeeklyKind::FrequentPostMealSpikes => "frequent_post_meal_spikes",
            WeeklyKind::FrequentLows => "frequent_lows",
            WeeklyKind::StableWellTracked => "stable_well_tracked",
            WeeklyKind::Stable => "stable",
        }
    }
}

impl fmt::Display for WeeklyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Week-over-week commentary with the averages it was based on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyInsight {
    pub kind: WeeklyKind,
    pub message: String,
    /// Rounded average of the last 7 days, when there were readings
    pub current_average: Option<i64>,
    /// Rounded average of the 7 days before that, when there were readings
    pub previous_average: Option<i64>,
    pub current_count: usize,
}

/// Direction of the most recent readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Trend::Up => "📈",
            Trend::Down => "📉",
            Trend::Stable => "➡️",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Trend::Up),
            "down" => Ok(Trend::Down),
            "stable" => Ok(Trend::Stable),
            _ => Err(format!("Unknown trend: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_kind_roundtrip_names() {
        for kind in [
            InsightKind::Onboarding,
            InsightKind::LatestElevated,
            InsightKind::FastingOnTarget,
            InsightKind::KeepTracking,
        ] {
            assert_eq!(kind.as_str().parse::<InsightKind>(), Ok(kind));
        }
        assert!("bogus".parse::<InsightKind>().is_err());
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(InsightKind::LatestLow.severity(), Severity::Warning);
        assert_eq!(InsightKind::AverageHigh.severity(), Severity::Attention);
        assert_eq!(InsightKind::InRangeStreak.severity(), Severity::Info);
    }

    #[test]
    fn test_trend_serde() {
        assert_eq!(serde_json::to_string(&Trend::Up).unwrap(), "\"up\"");
        assert_eq!(Trend::Stable.emoji(), "➡️");
    }
}
