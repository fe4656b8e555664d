//! Statistics engine
//!
//! Pure aggregate computations over a set of readings: rounded average,
//! highest/lowest reading, and the low / in-range / high partition.
//! Windowed variants take an explicit `reference_time` so results never
//! depend on the wall clock.

use serde::{Deserialize, Serialize};

use crate::models::{GlucoseStatus, Reading, ReadingType, MS_PER_DAY};

/// Aggregate statistics over a set of readings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Mean value rounded half-up; 0 when there are no readings
    pub average: i64,
    pub highest: Option<Reading>,
    pub lowest: Option<Reading>,
    pub total: usize,
    pub in_range: usize,
    pub high_count: usize,
    pub low_count: usize,
}

impl StatsSnapshot {
    /// Share of in-range readings as a rounded percentage (0 when empty)
    pub fn in_range_percent(&self) -> i64 {
        percent(self.in_range, self.total)
    }

    pub fn high_percent(&self) -> i64 {
        percent(self.high_count, self.total)
    }

    pub fn low_percent(&self) -> i64 {
        percent(self.low_count, self.total)
    }
}

/// Windowed readings split by reading type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingsByType {
    pub fasting: Vec<Reading>,
    pub post_meal: Vec<Reading>,
    pub random: Vec<Reading>,
}

impl ReadingsByType {
    pub fn get(&self, reading_type: ReadingType) -> &[Reading] {
        match reading_type {
            ReadingType::Fasting => &self.fasting,
            ReadingType::PostMeal => &self.post_meal,
            ReadingType::Random => &self.random,
        }
    }
}

/// Windowed statistics plus the per-type partition of the window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedStats {
    #[serde(flatten)]
    pub stats: StatsSnapshot,
    pub by_type: ReadingsByType,
}

/// Round to the nearest integer, halves toward positive infinity
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn percent(part: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    round_half_up(part as f64 / total as f64 * 100.0)
}

/// Arithmetic mean of reading values, None when empty
pub(crate) fn mean<'a>(readings: impl IntoIterator<Item = &'a Reading>) -> Option<f64> {
    let (sum, count) = readings
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), r| (sum + r.value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Compute statistics over all given readings
pub fn compute_stats(readings: &[Reading]) -> StatsSnapshot {
    let Some(first) = readings.first() else {
        return StatsSnapshot::default();
    };

    let mut highest = first;
    let mut lowest = first;
    let mut sum = 0.0;
    let (mut in_range, mut high_count, mut low_count) = (0, 0, 0);

    for reading in readings {
        sum += reading.value;
        // Strict comparisons keep the first occurrence on ties
        if reading.value > highest.value {
            highest = reading;
        }
        if reading.value < lowest.value {
            lowest = reading;
        }
        match reading.status() {
            GlucoseStatus::Low => low_count += 1,
            GlucoseStatus::Normal => in_range += 1,
            GlucoseStatus::High => high_count += 1,
        }
    }

    StatsSnapshot {
        average: round_half_up(sum / readings.len() as f64),
        highest: Some(highest.clone()),
        lowest: Some(lowest.clone()),
        total: readings.len(),
        in_range,
        high_count,
        low_count,
    }
}

/// Readings with `start <= timestamp <= end`, preserving input order
pub fn readings_between(readings: &[Reading], start: i64, end: i64) -> Vec<Reading> {
    readings
        .iter()
        .filter(|r| r.timestamp >= start && r.timestamp <= end)
        .cloned()
        .collect()
}

/// Readings from the `window_days` days ending at `reference_time`
pub fn window(readings: &[Reading], window_days: u32, reference_time: i64) -> Vec<Reading> {
    let start = reference_time - i64::from(window_days) * MS_PER_DAY;
    readings_between(readings, start, reference_time)
}

/// Compute statistics over the readings inside a lookback window
pub fn compute_windowed_stats(
    readings: &[Reading],
    window_days: u32,
    reference_time: i64,
) -> StatsSnapshot {
    compute_stats(&window(readings, window_days, reference_time))
}

/// Windowed statistics with the window's readings partitioned by type
pub fn detailed_stats(readings: &[Reading], days: u32, reference_time: i64) -> DetailedStats {
    let period = window(readings, days, reference_time);
    let stats = compute_stats(&period);

    let mut by_type = ReadingsByType::default();
    for reading in period {
        match reading.reading_type {
            ReadingType::Fasting => by_type.fasting.push(reading),
            ReadingType::PostMeal => by_type.post_meal.push(reading),
            ReadingType::Random => by_type.random.push(reading),
        }
    }

    DetailedStats { stats, by_type }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{reading, reading_at, reading_with_id, REFERENCE_TIME};

    #[test]
    fn test_empty_snapshot() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.average, 0);
        assert!(stats.highest.is_none());
        assert!(stats.lowest.is_none());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.in_range + stats.high_count + stats.low_count, 0);
        assert_eq!(stats, StatsSnapshot::default());
    }

    #[test]
    fn test_average_rounds_half_up() {
        let readings = vec![reading(70.0), reading(71.0)];
        assert_eq!(compute_stats(&readings).average, 71);

        let readings = vec![reading(100.0), reading(100.0), reading(101.0)];
        assert_eq!(compute_stats(&readings).average, 100);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(70.5), 71);
        assert_eq!(round_half_up(70.49), 70);
        assert_eq!(round_half_up(-0.5), 0);
    }

    #[test]
    fn test_tie_break_first_occurrence() {
        let readings = vec![
            reading_with_id("a", 100.0),
            reading_with_id("b", 100.0),
        ];
        let stats = compute_stats(&readings);
        assert_eq!(stats.highest.unwrap().id, "a");
        assert_eq!(stats.lowest.unwrap().id, "a");
    }

    #[test]
    fn test_highest_lowest() {
        let readings = vec![
            reading_with_id("a", 120.0),
            reading_with_id("b", 65.0),
            reading_with_id("c", 210.0),
            reading_with_id("d", 65.0),
        ];
        let stats = compute_stats(&readings);
        assert_eq!(stats.highest.unwrap().id, "c");
        assert_eq!(stats.lowest.unwrap().id, "b");
    }

    #[test]
    fn test_partition_sums_to_total() {
        let values = [55.0, 69.9, 70.0, 100.0, 140.0, 140.1, 300.0, 600.0, 1.0];
        let readings: Vec<Reading> = values.iter().map(|v| reading(*v)).collect();
        let stats = compute_stats(&readings);
        assert_eq!(stats.total, values.len());
        assert_eq!(stats.low_count, 3);
        assert_eq!(stats.in_range, 3);
        assert_eq!(stats.high_count, 3);
        assert_eq!(stats.in_range + stats.high_count + stats.low_count, stats.total);
    }

    #[test]
    fn test_out_of_domain_values_are_bucketed() {
        let readings = vec![reading(-10.0), reading(900.0)];
        let stats = compute_stats(&readings);
        assert_eq!(stats.low_count, 1);
        assert_eq!(stats.high_count, 1);
        assert_eq!(stats.average, 445);
    }

    #[test]
    fn test_windowed_stats_bounds_inclusive() {
        let readings = vec![
            reading_at(100.0, REFERENCE_TIME),
            reading_at(200.0, REFERENCE_TIME - 7 * MS_PER_DAY),
            reading_at(300.0, REFERENCE_TIME - 7 * MS_PER_DAY - 1),
            reading_at(400.0, REFERENCE_TIME + 1),
        ];
        let stats = compute_windowed_stats(&readings, 7, REFERENCE_TIME);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.average, 150);
    }

    #[test]
    fn test_detailed_stats_all_old_readings() {
        let readings = vec![
            reading_at(100.0, REFERENCE_TIME - 15 * MS_PER_DAY),
            reading_at(200.0, REFERENCE_TIME - 30 * MS_PER_DAY),
        ];
        let detailed = detailed_stats(&readings, 14, REFERENCE_TIME);
        assert_eq!(detailed.stats.total, 0);
        assert_eq!(detailed.stats.average, 0);
        assert!(detailed.stats.highest.is_none());
        assert!(detailed.by_type.fasting.is_empty());
        assert!(detailed.by_type.post_meal.is_empty());
        assert!(detailed.by_type.random.is_empty());
    }

    #[test]
    fn test_detailed_stats_by_type() {
        use crate::test_utils::typed_reading_at;

        let readings = vec![
            typed_reading_at(ReadingType::Fasting, 95.0, REFERENCE_TIME - MS_PER_DAY),
            typed_reading_at(ReadingType::PostMeal, 160.0, REFERENCE_TIME - 2 * MS_PER_DAY),
            typed_reading_at(ReadingType::Fasting, 105.0, REFERENCE_TIME - 3 * MS_PER_DAY),
            typed_reading_at(ReadingType::Random, 60.0, REFERENCE_TIME - 20 * MS_PER_DAY),
        ];
        let detailed = detailed_stats(&readings, 14, REFERENCE_TIME);
        assert_eq!(detailed.stats.total, 3);
        assert_eq!(detailed.by_type.fasting.len(), 2);
        assert_eq!(detailed.by_type.get(ReadingType::PostMeal).len(), 1);
        assert!(detailed.by_type.random.is_empty());
        assert_eq!(detailed.stats.high_count, 1);
        assert_eq!(detailed.stats.low_count, 0);
    }

    #[test]
    fn test_percentages() {
        let readings = vec![reading(60.0), reading(100.0), reading(120.0)];
        let stats = compute_stats(&readings);
        assert_eq!(stats.in_range_percent(), 67);
        assert_eq!(stats.low_percent(), 33);
        assert_eq!(stats.high_percent(), 0);
        assert_eq!(StatsSnapshot::default().in_range_percent(), 0);
    }

    #[test]
    fn test_detailed_stats_serializes_flat() {
        let detailed = detailed_stats(&[reading_at(100.0, REFERENCE_TIME)], 14, REFERENCE_TIME);
        let json = serde_json::to_value(&detailed).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["average"], 100);
        assert!(json["by_type"]["fasting"].is_array());
    }
}
