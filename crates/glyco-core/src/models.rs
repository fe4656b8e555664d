//! Domain models for Glyco

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Milliseconds in one hour
pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Milliseconds in one day
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Largest accepted glucose value (mg/dL)
pub const MAX_GLUCOSE_VALUE: f64 = 600.0;

/// Maximum length of a reading note
pub const MAX_NOTES_LEN: usize = 200;

/// Below this value a reading is low (mg/dL)
pub const LOW_THRESHOLD: f64 = 70.0;

/// Above this value a reading is high (mg/dL)
pub const HIGH_THRESHOLD: f64 = 140.0;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a millisecond timestamp to local time (None if out of chrono's range)
pub fn to_local(timestamp: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(timestamp).single()
}

/// Format a millisecond timestamp in local time, falling back to the raw value
pub fn format_timestamp(timestamp: i64, fmt: &str) -> String {
    to_local(timestamp)
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// When a reading was taken relative to meals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadingType {
    Fasting,
    #[serde(rename = "Post-meal")]
    PostMeal,
    Random,
}

impl ReadingType {
    pub const ALL: [ReadingType; 3] = [Self::Fasting, Self::PostMeal, Self::Random];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fasting => "Fasting",
            Self::PostMeal => "Post-meal",
            Self::Random => "Random",
        }
    }
}

impl std::str::FromStr for ReadingType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fasting" => Ok(Self::Fasting),
            "post-meal" | "postmeal" | "post_meal" => Ok(Self::PostMeal),
            "random" => Ok(Self::Random),
            _ => Err(format!(
                "Unknown reading type: {}. Available: fasting, post-meal, random",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReadingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single glucose measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    #[serde(rename = "type")]
    pub reading_type: ReadingType,
    /// Glucose concentration in mg/dL
    pub value: f64,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Reading {
    pub fn status(&self) -> GlucoseStatus {
        GlucoseStatus::from_value(self.value)
    }
}

/// Input for recording a new reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReading {
    #[serde(rename = "type")]
    pub reading_type: ReadingType,
    pub value: f64,
    /// Defaults to the current time when absent
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewReading {
    pub fn new(reading_type: ReadingType, value: f64) -> Self {
        Self {
            reading_type,
            value,
            timestamp: None,
            notes: None,
        }
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update of an existing reading. Absent fields are left unchanged;
/// an empty `notes` string clears the note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadingUpdate {
    #[serde(default, rename = "type")]
    pub reading_type: Option<ReadingType>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ReadingUpdate {
    pub fn is_empty(&self) -> bool {
        self.reading_type.is_none()
            && self.value.is_none()
            && self.timestamp.is_none()
            && self.notes.is_none()
    }

    /// Apply this update to a reading, validating changed fields
    pub fn apply(&self, reading: &Reading) -> Result<Reading> {
        let mut updated = reading.clone();
        if let Some(reading_type) = self.reading_type {
            updated.reading_type = reading_type;
        }
        if let Some(value) = self.value {
            validate_value(value)?;
            updated.value = value;
        }
        if let Some(timestamp) = self.timestamp {
            updated.timestamp = timestamp;
        }
        if let Some(ref notes) = self.notes {
            updated.notes = normalize_notes(Some(notes))?;
        }
        Ok(updated)
    }
}

/// Check that a glucose value lies in (0, 600]
pub fn validate_value(value: f64) -> Result<()> {
    if value.is_nan() || value <= 0.0 || value > MAX_GLUCOSE_VALUE {
        return Err(Error::InvalidData(
            "Invalid glucose value. Must be between 1 and 600 mg/dL".to_string(),
        ));
    }
    Ok(())
}

/// Trim notes, map empty to None, and enforce the length limit
pub fn normalize_notes(notes: Option<&str>) -> Result<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(Error::InvalidData(format!(
            "Notes must be at most {} characters",
            MAX_NOTES_LEN
        )));
    }
    Ok(Some(notes.to_string()))
}

/// Clinical range classification of a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlucoseStatus {
    Low,
    Normal,
    High,
}

impl GlucoseStatus {
    pub fn from_value(value: f64) -> Self {
        if value < LOW_THRESHOLD {
            Self::Low
        } else if value > HIGH_THRESHOLD {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }

    /// Display color used by reports
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#FF9800",
            Self::Normal => "#4CAF50",
            Self::High => "#F44336",
        }
    }
}

impl std::fmt::Display for GlucoseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// History date range filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    /// Since local midnight of the reference day
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
}

impl DateRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Earliest timestamp included by this range, or None for no lower bound
    pub fn start(&self, reference_time: i64) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Today => Some(local_midnight(reference_time)),
            Self::Week => Some(reference_time - 7 * MS_PER_DAY),
            Self::Month => Some(reference_time - 30 * MS_PER_DAY),
        }
    }
}

impl std::str::FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" | "7d" => Ok(Self::Week),
            "month" | "30d" => Ok(Self::Month),
            _ => Err(format!(
                "Unknown date range: {}. Available: all, today, week, month",
                s
            )),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Start of the local day containing `timestamp`
fn local_midnight(timestamp: i64) -> i64 {
    to_local(timestamp)
        .and_then(|dt| dt.date_naive().and_hms_opt(0, 0, 0))
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|midnight| midnight.timestamp_millis())
        .unwrap_or(timestamp - timestamp.rem_euclid(MS_PER_DAY))
}

/// History filter: reading type plus date range
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReadingFilter {
    /// None means all types
    #[serde(default, rename = "type")]
    pub reading_type: Option<ReadingType>,
    #[serde(default)]
    pub range: DateRange,
}

impl ReadingFilter {
    pub fn matches(&self, reading: &Reading, reference_time: i64) -> bool {
        if let Some(t) = self.reading_type {
            if reading.reading_type != t {
                return false;
            }
        }
        match self.range.start(reference_time) {
            Some(start) => reading.timestamp >= start,
            None => true,
        }
    }

    /// Number of active (non-default) filters
    pub fn active_count(&self) -> usize {
        usize::from(self.reading_type.is_some()) + usize::from(self.range != DateRange::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(reading_type: ReadingType, value: f64, timestamp: i64) -> Reading {
        Reading {
            id: "r".to_string(),
            reading_type,
            value,
            timestamp,
            notes: None,
        }
    }

    #[test]
    fn test_reading_type_serde_names() {
        let json = serde_json::to_string(&ReadingType::PostMeal).unwrap();
        assert_eq!(json, "\"Post-meal\"");
        let parsed: ReadingType = serde_json::from_str("\"Fasting\"").unwrap();
        assert_eq!(parsed, ReadingType::Fasting);
    }

    #[test]
    fn test_reading_type_from_str() {
        assert_eq!("post-meal".parse::<ReadingType>(), Ok(ReadingType::PostMeal));
        assert_eq!("RANDOM".parse::<ReadingType>(), Ok(ReadingType::Random));
        assert!("snack".parse::<ReadingType>().is_err());
    }

    #[test]
    fn test_reading_json_shape() {
        let r = reading(ReadingType::Random, 101.0, 1_700_000_000_000);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["type"], "Random");
        assert_eq!(json["value"], 101.0);
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_validate_value_bounds() {
        assert!(validate_value(0.0).is_err());
        assert!(validate_value(-5.0).is_err());
        assert!(validate_value(600.5).is_err());
        assert!(validate_value(f64::NAN).is_err());
        assert!(validate_value(1.0).is_ok());
        assert!(validate_value(600.0).is_ok());
    }

    #[test]
    fn test_normalize_notes() {
        assert_eq!(normalize_notes(None).unwrap(), None);
        assert_eq!(normalize_notes(Some("   ")).unwrap(), None);
        assert_eq!(
            normalize_notes(Some(" after lunch ")).unwrap(),
            Some("after lunch".to_string())
        );
        let long = "x".repeat(MAX_NOTES_LEN + 1);
        assert!(normalize_notes(Some(&long)).is_err());
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(GlucoseStatus::from_value(69.9), GlucoseStatus::Low);
        assert_eq!(GlucoseStatus::from_value(70.0), GlucoseStatus::Normal);
        assert_eq!(GlucoseStatus::from_value(140.0), GlucoseStatus::Normal);
        assert_eq!(GlucoseStatus::from_value(140.1), GlucoseStatus::High);
    }

    #[test]
    fn test_update_apply() {
        let original = reading(ReadingType::Fasting, 95.0, 1_000);
        let update = ReadingUpdate {
            value: Some(120.0),
            notes: Some("retest".to_string()),
            ..Default::default()
        };
        let updated = update.apply(&original).unwrap();
        assert_eq!(updated.value, 120.0);
        assert_eq!(updated.reading_type, ReadingType::Fasting);
        assert_eq!(updated.notes.as_deref(), Some("retest"));

        let clear = ReadingUpdate {
            notes: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(clear.apply(&updated).unwrap().notes, None);

        let bad = ReadingUpdate {
            value: Some(0.0),
            ..Default::default()
        };
        assert!(bad.apply(&original).is_err());
    }

    #[test]
    fn test_filter_week_and_type() {
        let now = 100 * MS_PER_DAY;
        let filter = ReadingFilter {
            reading_type: Some(ReadingType::Fasting),
            range: DateRange::Week,
        };
        assert!(filter.matches(&reading(ReadingType::Fasting, 90.0, now - MS_PER_DAY), now));
        assert!(!filter.matches(&reading(ReadingType::Random, 90.0, now - MS_PER_DAY), now));
        assert!(!filter.matches(&reading(ReadingType::Fasting, 90.0, now - 8 * MS_PER_DAY), now));
        assert_eq!(filter.active_count(), 2);
    }

    #[test]
    fn test_filter_today() {
        let now = 100 * MS_PER_DAY + 15 * MS_PER_HOUR;
        let filter = ReadingFilter {
            reading_type: None,
            range: DateRange::Today,
        };
        assert!(filter.matches(&reading(ReadingType::Random, 90.0, now), now));
        assert!(!filter.matches(&reading(ReadingType::Random, 90.0, now - 2 * MS_PER_DAY), now));
    }

    #[test]
    fn test_date_range_from_str() {
        assert_eq!("week".parse::<DateRange>(), Ok(DateRange::Week));
        assert_eq!("30d".parse::<DateRange>(), Ok(DateRange::Month));
        assert!("year".parse::<DateRange>().is_err());
    }
}
