//! Home screen summary assembled from the statistics and insight engines

use serde::{Deserialize, Serialize};

use crate::insights::{
    evaluate_insight, evaluate_weekly_insight, get_trend, Insight, Trend, WeeklyInsight,
};
use crate::models::{GlucoseStatus, Reading};
use crate::profile::personalized_greeting;
use crate::stats::{compute_stats, compute_windowed_stats, StatsSnapshot};

/// Lookback for the "this week" card
pub const DASHBOARD_WINDOW_DAYS: u32 = 7;

/// Most recent reading with its range classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestReading {
    #[serde(flatten)]
    pub reading: Reading,
    pub status: GlucoseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub greeting: String,
    pub latest: Option<LatestReading>,
    pub all_time: StatsSnapshot,
    pub last_7_days: StatsSnapshot,
    pub trend: Trend,
    pub trend_emoji: String,
    pub insight: Insight,
    pub weekly: WeeklyInsight,
}

/// Build the dashboard from readings sorted newest first
///
/// The insight cascade uses the all-time rounded average.
pub fn build_dashboard(
    readings: &[Reading],
    name: Option<&str>,
    reference_time: i64,
    hour: u32,
) -> Dashboard {
    let all_time = compute_stats(readings);
    let latest = readings.first();
    let trend = get_trend(readings);

    Dashboard {
        greeting: personalized_greeting(hour, name),
        latest: latest.map(|r| LatestReading {
            reading: r.clone(),
            status: r.status(),
        }),
        last_7_days: compute_windowed_stats(readings, DASHBOARD_WINDOW_DAYS, reference_time),
        trend,
        trend_emoji: trend.emoji().to_string(),
        insight: evaluate_insight(readings, latest, all_time.average as f64),
        weekly: evaluate_weekly_insight(readings, reference_time),
        all_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::{InsightKind, WeeklyKind};
    use crate::models::MS_PER_DAY;
    use crate::test_utils::{reading_at, REFERENCE_TIME};

    #[test]
    fn test_empty_dashboard() {
        let dashboard = build_dashboard(&[], None, REFERENCE_TIME, 9);
        assert_eq!(dashboard.greeting, "Good morning! 👋");
        assert!(dashboard.latest.is_none());
        assert_eq!(dashboard.all_time.total, 0);
        assert_eq!(dashboard.trend, Trend::Stable);
        assert_eq!(dashboard.insight.kind, InsightKind::Onboarding);
        assert_eq!(dashboard.weekly.kind, WeeklyKind::TooLittleData);
    }

    #[test]
    fn test_dashboard_with_readings() {
        let readings = vec![
            reading_at(160.0, REFERENCE_TIME - 1000),
            reading_at(120.0, REFERENCE_TIME - MS_PER_DAY),
            reading_at(110.0, REFERENCE_TIME - 10 * MS_PER_DAY),
        ];
        let dashboard = build_dashboard(&readings, Some("Jo"), REFERENCE_TIME, 15);

        assert_eq!(dashboard.greeting, "Good afternoon, Jo! 👋");
        let latest = dashboard.latest.unwrap();
        assert_eq!(latest.reading.value, 160.0);
        assert_eq!(latest.status, GlucoseStatus::High);
        assert_eq!(dashboard.all_time.total, 3);
        assert_eq!(dashboard.last_7_days.total, 2);
        assert_eq!(dashboard.trend, Trend::Up);
        assert_eq!(dashboard.trend_emoji, "📈");
        assert_eq!(dashboard.insight.kind, InsightKind::LatestElevated);
        assert_eq!(dashboard.weekly.kind, WeeklyKind::AverageRose);
    }

    #[test]
    fn test_latest_serializes_flat() {
        let readings = vec![reading_at(65.0, REFERENCE_TIME)];
        let dashboard = build_dashboard(&readings, None, REFERENCE_TIME, 20);
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["latest"]["value"], 65.0);
        assert_eq!(json["latest"]["status"], "low");
        assert_eq!(json["trend"], "stable");
    }
}
