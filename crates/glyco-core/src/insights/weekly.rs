//! Week-over-week comparison
//!
//! The current week is `[reference_time - 7d, reference_time]` and the
//! previous week is `[reference_time - 14d, reference_time - 7d]`. Both
//! bounds are inclusive, so a reading exactly seven days old counts toward
//! both weeks.

use tracing::debug;

use crate::models::{Reading, ReadingType, MS_PER_DAY};
use crate::stats::{mean, readings_between, round_half_up};

use super::types::{WeeklyInsight, WeeklyKind};

const WEEK_MS: i64 = 7 * MS_PER_DAY;

/// Rounded-average change that counts as a real shift
const AVERAGE_SHIFT: i64 = 5;

const FASTING_HIGH: f64 = 110.0;
const POST_MEAL_SPIKE: f64 = 160.0;
const LOW: f64 = 70.0;

const MIN_FASTING_HIGHS: usize = 3;
const MIN_POST_MEAL_SPIKES: usize = 3;
const MIN_LOWS: usize = 2;
const WELL_TRACKED_COUNT: usize = 7;

fn rounded_mean(readings: &[Reading]) -> i64 {
    mean(readings).map(round_half_up).unwrap_or(0)
}

fn count_where(readings: &[Reading], pred: impl Fn(&Reading) -> bool) -> usize {
    readings.iter().filter(|r| pred(r)).count()
}

/// Compare the last seven days against the seven before them
pub fn evaluate_weekly_insight(readings: &[Reading], reference_time: i64) -> WeeklyInsight {
    let mut insight = WeeklyInsight {
        kind: WeeklyKind::TooLittleData,
        message: String::new(),
        current_average: None,
        previous_average: None,
        current_count: 0,
    };

    if readings.len() < 2 {
        insight.message = "Add more readings to see weekly trends!".to_string();
        return insight;
    }

    let current_start = reference_time - WEEK_MS;
    let current = readings_between(readings, current_start, reference_time);
    let previous = readings_between(readings, reference_time - 2 * WEEK_MS, current_start);
    insight.current_count = current.len();

    if current.is_empty() {
        insight.kind = WeeklyKind::NoDataThisWeek;
        insight.message = "No readings this week. Stay consistent with your tracking!".to_string();
        return insight;
    }
    let avg = rounded_mean(&current);
    insight.current_average = Some(avg);

    if previous.is_empty() {
        insight.kind = WeeklyKind::NoPreviousWeek;
        insight.message =
            "Keep tracking! Add more readings to see weekly comparisons.".to_string();
        return insight;
    }
    let prev = rounded_mean(&previous);
    insight.previous_average = Some(prev);

    let (kind, message) = compare_weeks(&current, avg, prev);
    debug!(
        kind = kind.as_str(),
        current = avg,
        previous = prev,
        "Weekly insight"
    );
    insight.kind = kind;
    insight.message = message;
    insight
}

fn compare_weeks(current: &[Reading], avg: i64, prev: i64) -> (WeeklyKind, String) {
    let difference = avg - prev;
    if difference > AVERAGE_SHIFT {
        return (
            WeeklyKind::AverageRose,
            format!(
                "📈 Your glucose average rose this week ({} vs {} mg/dL last week).",
                avg, prev
            ),
        );
    }
    if difference < -AVERAGE_SHIFT {
        return (
            WeeklyKind::AverageImproved,
            format!(
                "📉 Great job — readings improved this week! ({} vs {} mg/dL last week)",
                avg, prev
            ),
        );
    }

    let fasting_highs = count_where(current, |r| {
        r.reading_type == ReadingType::Fasting && r.value > FASTING_HIGH
    });
    if fasting_highs >= MIN_FASTING_HIGHS {
        return (
            WeeklyKind::FrequentHighFasting,
            format!(
                "🌅 You've had {} high fasting readings recently. Consider reviewing your evening routine.",
                fasting_highs
            ),
        );
    }

    let spikes = count_where(current, |r| {
        r.reading_type == ReadingType::PostMeal && r.value > POST_MEAL_SPIKE
    });
    if spikes >= MIN_POST_MEAL_SPIKES {
        return (
            WeeklyKind::FrequentPostMealSpikes,
            format!(
                "🍽️ You've had {} post-meal spikes this week. Consider portion sizes or meal composition.",
                spikes
            ),
        );
    }

    let lows = count_where(current, |r| r.value < LOW);
    if lows >= MIN_LOWS {
        return (
            WeeklyKind::FrequentLows,
            format!(
                "⚠️ You've had {} low readings this week. Discuss with your healthcare provider if this continues.",
                lows
            ),
        );
    }

    if current.len() >= WELL_TRACKED_COUNT {
        return (
            WeeklyKind::StableWellTracked,
            format!(
                "✅ Stable week with {} readings. Keep tracking daily!",
                current.len()
            ),
        );
    }

    (
        WeeklyKind::Stable,
        format!(
            "➡️ Stable week. Keep tracking daily! ({} readings this week)",
            current.len()
        ),
    )
}

/// Message of the week-over-week comparison
pub fn get_weekly_insight(readings: &[Reading], reference_time: i64) -> String {
    evaluate_weekly_insight(readings, reference_time).message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{reading_at, typed_reading_at, REFERENCE_TIME};

    fn days_ago(days: i64) -> i64 {
        REFERENCE_TIME - days * MS_PER_DAY
    }

    #[test]
    fn test_too_little_data() {
        let insight = evaluate_weekly_insight(&[reading_at(100.0, REFERENCE_TIME)], REFERENCE_TIME);
        assert_eq!(insight.kind, WeeklyKind::TooLittleData);
        assert_eq!(insight.message, "Add more readings to see weekly trends!");
    }

    #[test]
    fn test_no_data_this_week() {
        let readings = vec![reading_at(100.0, days_ago(9)), reading_at(110.0, days_ago(10))];
        let insight = evaluate_weekly_insight(&readings, REFERENCE_TIME);
        assert_eq!(insight.kind, WeeklyKind::NoDataThisWeek);
        assert!(insight.current_average.is_none());
    }

    #[test]
    fn test_no_previous_week() {
        let readings = vec![reading_at(100.0, days_ago(1)), reading_at(110.0, days_ago(2))];
        let insight = evaluate_weekly_insight(&readings, REFERENCE_TIME);
        assert_eq!(insight.kind, WeeklyKind::NoPreviousWeek);
        assert_eq!(insight.current_average, Some(105));
        assert_eq!(insight.current_count, 2);
    }

    #[test]
    fn test_average_rose() {
        let readings = vec![reading_at(120.0, days_ago(1)), reading_at(110.0, days_ago(10))];
        let message = get_weekly_insight(&readings, REFERENCE_TIME);
        assert!(message.contains("rose this week"));
        assert!(message.contains("120"));
        assert!(message.contains("110"));
    }

    #[test]
    fn test_average_improved() {
        let readings = vec![reading_at(100.0, days_ago(1)), reading_at(120.0, days_ago(10))];
        let insight = evaluate_weekly_insight(&readings, REFERENCE_TIME);
        assert_eq!(insight.kind, WeeklyKind::AverageImproved);
        assert_eq!(insight.previous_average, Some(120));
    }

    #[test]
    fn test_difference_of_five_is_stable() {
        let readings = vec![reading_at(115.0, days_ago(1)), reading_at(110.0, days_ago(10))];
        let insight = evaluate_weekly_insight(&readings, REFERENCE_TIME);
        assert_eq!(insight.kind, WeeklyKind::Stable);
        assert!(insight.message.contains("(1 readings this week)"));
    }

    #[test]
    fn test_frequent_high_fasting() {
        let readings = vec![
            typed_reading_at(ReadingType::Fasting, 115.0, days_ago(1)),
            typed_reading_at(ReadingType::Fasting, 116.0, days_ago(2)),
            typed_reading_at(ReadingType::Fasting, 114.0, days_ago(3)),
            typed_reading_at(ReadingType::Fasting, 113.0, days_ago(10)),
        ];
        let insight = evaluate_weekly_insight(&readings, REFERENCE_TIME);
        assert_eq!(insight.kind, WeeklyKind::FrequentHighFasting);
        assert!(insight.message.contains("3 high fasting"));
    }

    #[test]
    fn test_frequent_post_meal_spikes() {
        let readings = vec![
            typed_reading_at(ReadingType::PostMeal, 165.0, days_ago(1)),
            typed_reading_at(ReadingType::PostMeal, 170.0, days_ago(2)),
            typed_reading_at(ReadingType::PostMeal, 168.0, days_ago(3)),
            typed_reading_at(ReadingType::PostMeal, 167.0, days_ago(12)),
        ];
        let insight = evaluate_weekly_insight(&readings, REFERENCE_TIME);
        assert_eq!(insight.kind, WeeklyKind::FrequentPostMealSpikes);
    }

    #[test]
    fn test_frequent_lows() {
        let readings = vec![
            reading_at(65.0, days_ago(1)),
            reading_at(66.0, days_ago(2)),
            reading_at(66.0, days_ago(11)),
        ];
        let insight = evaluate_weekly_insight(&readings, REFERENCE_TIME);
        assert_eq!(insight.kind, WeeklyKind::FrequentLows);
        assert!(insight.message.contains("2 low readings"));
    }

    #[test]
    fn test_stable_well_tracked() {
        let mut readings: Vec<Reading> = (0..7)
            .map(|d| reading_at(100.0, days_ago(d)))
            .collect();
        readings.push(reading_at(100.0, days_ago(8)));
        let insight = evaluate_weekly_insight(&readings, REFERENCE_TIME);
        assert_eq!(insight.kind, WeeklyKind::StableWellTracked);
        assert_eq!(insight.current_count, 7);
    }

    #[test]
    fn test_boundary_reading_counts_in_both_weeks() {
        let readings = vec![reading_at(100.0, days_ago(7)), reading_at(100.0, days_ago(20))];
        let insight = evaluate_weekly_insight(&readings, REFERENCE_TIME);
        assert_eq!(insight.current_count, 1);
        assert_eq!(insight.previous_average, Some(100));
    }
}
