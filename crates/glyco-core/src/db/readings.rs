//! Reading store operations
//!
//! All listings are ordered newest first; callers never rely on insertion order.

use rusqlite::{params, OptionalExtension, Row, ToSql};
use tracing::info;
use uuid::Uuid;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{
    normalize_notes, now_millis, validate_value, NewReading, Reading, ReadingFilter, ReadingType,
    ReadingUpdate,
};

const READING_COLUMNS: &str = "id, type, value, timestamp, notes";

fn row_to_reading(row: &Row<'_>) -> rusqlite::Result<Reading> {
    let type_str: String = row.get(1)?;
    let reading_type = type_str.parse::<ReadingType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            Box::new(Error::InvalidData(e)),
        )
    })?;
    Ok(Reading {
        id: row.get(0)?,
        reading_type,
        value: row.get(2)?,
        timestamp: row.get(3)?,
        notes: row.get(4)?,
    })
}

impl Database {
    /// Validate and store a new reading, returning it with its generated id
    pub fn insert_reading(&self, new: &NewReading) -> Result<Reading> {
        validate_value(new.value)?;
        let reading = Reading {
            id: Uuid::new_v4().to_string(),
            reading_type: new.reading_type,
            value: new.value,
            timestamp: new.timestamp.unwrap_or_else(now_millis),
            notes: normalize_notes(new.notes.as_deref())?,
        };

        self.write_reading(&reading)?;
        info!(
            id = %reading.id,
            value = reading.value,
            reading_type = reading.reading_type.as_str(),
            "Saved reading"
        );
        Ok(reading)
    }

    fn write_reading(&self, reading: &Reading) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO readings (id, type, value, timestamp, notes) VALUES (?, ?, ?, ?, ?)",
            params![
                reading.id,
                reading.reading_type.as_str(),
                reading.value,
                reading.timestamp,
                reading.notes,
            ],
        )?;
        Ok(())
    }

    /// All readings, newest first
    pub fn list_readings(&self) -> Result<Vec<Reading>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM readings ORDER BY timestamp DESC, created_at DESC, rowid DESC",
            READING_COLUMNS
        ))?;

        let readings = stmt
            .query_map([], row_to_reading)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Readings matching a history filter, newest first
    pub fn list_readings_filtered(
        &self,
        filter: &ReadingFilter,
        reference_time: i64,
    ) -> Result<Vec<Reading>> {
        let mut conditions = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(reading_type) = filter.reading_type {
            conditions.push("type = ?");
            values.push(Box::new(reading_type.as_str()));
        }
        if let Some(start) = filter.range.start(reference_time) {
            conditions.push("timestamp >= ?");
            values.push(Box::new(start));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM readings {} ORDER BY timestamp DESC, created_at DESC, rowid DESC",
            READING_COLUMNS, where_clause
        ))?;

        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let readings = stmt
            .query_map(params.as_slice(), row_to_reading)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Readings with `start <= timestamp <= end`, newest first
    pub fn readings_in_range(&self, start: i64, end: i64) -> Result<Vec<Reading>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM readings WHERE timestamp >= ? AND timestamp <= ? ORDER BY timestamp DESC, created_at DESC, rowid DESC",
            READING_COLUMNS
        ))?;

        let readings = stmt
            .query_map(params![start, end], row_to_reading)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Readings of one type, newest first
    pub fn readings_by_type(&self, reading_type: ReadingType) -> Result<Vec<Reading>> {
        self.list_readings_filtered(
            &ReadingFilter {
                reading_type: Some(reading_type),
                ..Default::default()
            },
            now_millis(),
        )
    }

    /// Get a reading by id
    pub fn get_reading(&self, id: &str) -> Result<Option<Reading>> {
        let conn = self.conn()?;
        let reading = conn
            .query_row(
                &format!("SELECT {} FROM readings WHERE id = ?", READING_COLUMNS),
                params![id],
                row_to_reading,
            )
            .optional()?;

        Ok(reading)
    }

    /// Merge a partial update into a reading. Returns None for an unknown id.
    pub fn update_reading(&self, id: &str, update: &ReadingUpdate) -> Result<Option<Reading>> {
        let Some(existing) = self.get_reading(id)? else {
            return Ok(None);
        };
        let updated = update.apply(&existing)?;

        let conn = self.conn()?;
        conn.execute(
            "UPDATE readings SET type = ?, value = ?, timestamp = ?, notes = ? WHERE id = ?",
            params![
                updated.reading_type.as_str(),
                updated.value,
                updated.timestamp,
                updated.notes,
                id,
            ],
        )?;

        info!(id, "Updated reading");
        Ok(Some(updated))
    }

    /// Delete a reading. Returns false if it did not exist.
    pub fn delete_reading(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM readings WHERE id = ?", params![id])?;
        if deleted > 0 {
            info!(id, "Deleted reading");
        }
        Ok(deleted > 0)
    }

    /// Remove every reading, returning how many were deleted
    pub fn clear_readings(&self) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM readings", [])?;
        info!(deleted, "Cleared readings");
        Ok(deleted)
    }

    pub fn count_readings(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
