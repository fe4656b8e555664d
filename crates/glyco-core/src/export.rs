//! Export and import of readings
//!
//! Supports:
//! - CSV export of every reading
//! - JSON backup documents (`BackupData`) with merge-on-import

use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{format_timestamp, now_millis, Reading};

/// Version written into every backup document
pub const BACKUP_VERSION: &str = "1.0";

/// Application version recorded in backups
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Portable backup document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub version: String,
    /// Creation time in epoch milliseconds
    pub timestamp: i64,
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub total_readings: usize,
    pub readings: Vec<Reading>,
}

impl BackupData {
    pub fn new(readings: Vec<Reading>, timestamp: i64) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            timestamp,
            app_version: APP_VERSION.to_string(),
            total_readings: readings.len(),
            readings,
        }
    }

    /// Parse and validate a backup document
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidData(format!("Invalid backup file format: {}", e)))?;
        data.validate()?;
        Ok(data)
    }

    /// Structural checks beyond what deserialization enforces
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() || self.timestamp == 0 {
            return Err(Error::InvalidData(
                "Invalid backup file format".to_string(),
            ));
        }
        if self.readings.iter().any(|r| r.id.is_empty()) {
            return Err(Error::InvalidData(
                "Invalid backup file format: reading without id".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Outcome of merging a backup into the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreResult {
    /// Readings added from the backup
    pub restored: usize,
    /// Readings skipped because their id already existed
    pub skipped: usize,
}

/// Render readings as CSV with a header row, in the given order
pub fn readings_to_csv(readings: &[Reading]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["date", "time", "value", "type", "status", "notes"])?;

    for reading in readings {
        writer.write_record([
            format_timestamp(reading.timestamp, "%Y-%m-%d"),
            format_timestamp(reading.timestamp, "%H:%M"),
            reading.value.to_string(),
            reading.reading_type.as_str().to_string(),
            reading.status().as_str().to_string(),
            reading.notes.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::InvalidData(format!("Failed to finish CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("Invalid CSV output: {}", e)))
}

impl Database {
    /// Export every reading as CSV, newest first, and record the export time
    pub fn export_csv(&self) -> Result<String> {
        let readings = self.list_readings()?;
        if readings.is_empty() {
            return Err(Error::InvalidData("No readings to export".to_string()));
        }

        let csv = readings_to_csv(&readings)?;
        self.record_export(now_millis())?;
        info!(readings = readings.len(), "Exported CSV");
        Ok(csv)
    }

    /// Snapshot every reading into a backup document
    pub fn export_backup_data(&self) -> Result<BackupData> {
        let readings = self.list_readings()?;
        if readings.is_empty() {
            return Err(Error::InvalidData("No readings to backup".to_string()));
        }
        Ok(BackupData::new(readings, now_millis()))
    }

    /// Backup document as pretty-printed JSON
    pub fn export_backup_json(&self) -> Result<String> {
        self.export_backup_data()?.to_json()
    }

    /// Validate a JSON backup document and merge it into the store
    pub fn import_backup_json(&self, json: &str) -> Result<RestoreResult> {
        let data = BackupData::from_json(json)?;
        self.merge_backup(&data)
    }

    /// Add readings whose id is not already stored; existing readings win
    pub fn merge_backup(&self, data: &BackupData) -> Result<RestoreResult> {
        data.validate()?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut result = RestoreResult::default();

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO readings (id, type, value, timestamp, notes) VALUES (?, ?, ?, ?, ?)",
            )?;
            for reading in &data.readings {
                let inserted = stmt.execute(params![
                    reading.id,
                    reading.reading_type.as_str(),
                    reading.value,
                    reading.timestamp,
                    reading.notes,
                ])?;
                if inserted > 0 {
                    result.restored += 1;
                } else {
                    result.skipped += 1;
                }
            }
        }
        tx.commit()?;

        info!(
            restored = result.restored,
            skipped = result.skipped,
            "Merged backup"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewReading, ReadingType};
    use crate::test_utils::{reading_with_id, REFERENCE_TIME};

    #[test]
    fn test_csv_escapes_notes() {
        let mut reading = reading_with_id("a", 95.0);
        reading.notes = Some("after run, felt \"fine\"".to_string());

        let csv = readings_to_csv(&[reading]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,time,value,type,status,notes"));
        let row = lines.next().unwrap();
        assert!(row.contains(",95,Random,Normal,"));
        assert!(row.ends_with("\"after run, felt \"\"fine\"\"\""));
    }

    #[test]
    fn test_export_csv_empty_store() {
        let db = Database::in_memory().unwrap();
        let err = db.export_csv().unwrap_err();
        assert!(err.to_string().contains("No readings to export"));
        assert!(db.last_export_timestamp().unwrap().is_none());
    }

    #[test]
    fn test_export_csv_records_timestamp() {
        let db = Database::in_memory().unwrap();
        db.insert_reading(&NewReading::new(ReadingType::Fasting, 92.0).at(REFERENCE_TIME))
            .unwrap();
        db.insert_reading(&NewReading::new(ReadingType::PostMeal, 150.0).at(REFERENCE_TIME + 1))
            .unwrap();

        let csv = db.export_csv().unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].contains("Post-meal"));
        assert!(rows[2].contains("Fasting"));
        assert!(db.last_export_timestamp().unwrap().is_some());
    }

    #[test]
    fn test_backup_json_shape() {
        let data = BackupData::new(vec![reading_with_id("a", 100.0)], REFERENCE_TIME);
        let json: serde_json::Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["totalReadings"], 1);
        assert_eq!(json["readings"][0]["type"], "Random");
        assert!(json["appVersion"].is_string());
    }

    #[test]
    fn test_backup_of_empty_store_fails() {
        let db = Database::in_memory().unwrap();
        let err = db.export_backup_json().unwrap_err();
        assert!(err.to_string().contains("No readings to backup"));
    }

    #[test]
    fn test_invalid_backups_rejected() {
        assert!(BackupData::from_json("not json").is_err());
        assert!(BackupData::from_json(r#"{"version":"1.0","timestamp":0,"readings":[]}"#).is_err());
        assert!(BackupData::from_json(r#"{"version":"","timestamp":5,"readings":[]}"#).is_err());
        let bad_type = r#"{"version":"1.0","timestamp":5,"readings":[
            {"id":"a","type":"Bedtime","value":100,"timestamp":1}
        ]}"#;
        assert!(BackupData::from_json(bad_type).is_err());
    }

    #[test]
    fn test_import_merges_and_skips_duplicates() {
        let db = Database::in_memory().unwrap();
        let existing = db
            .insert_reading(&NewReading::new(ReadingType::Random, 110.0).at(REFERENCE_TIME))
            .unwrap();

        let mut duplicate = existing.clone();
        duplicate.value = 300.0;
        let data = BackupData::new(
            vec![duplicate, reading_with_id("imported-1", 90.0)],
            REFERENCE_TIME,
        );

        let result = db.import_backup_json(&data.to_json().unwrap()).unwrap();
        assert_eq!(result, RestoreResult { restored: 1, skipped: 1 });

        assert_eq!(db.count_readings().unwrap(), 2);
        // Existing reading is not overwritten
        assert_eq!(db.get_reading(&existing.id).unwrap().unwrap().value, 110.0);
    }

    #[test]
    fn test_backup_roundtrip_between_databases() {
        let source = Database::in_memory().unwrap();
        for value in [85.0, 120.0, 165.0] {
            source
                .insert_reading(&NewReading::new(ReadingType::Random, value).at(REFERENCE_TIME))
                .unwrap();
        }
        let json = source.export_backup_json().unwrap();

        let target = Database::in_memory().unwrap();
        let result = target.import_backup_json(&json).unwrap();
        assert_eq!(result.restored, 3);
        assert_eq!(target.list_readings().unwrap().len(), 3);
    }
}
