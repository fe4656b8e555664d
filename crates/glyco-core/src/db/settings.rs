//! Key-value settings

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::Result;

/// Display name used in greetings
pub const SETTING_USER_NAME: &str = "user_name";
/// Epoch milliseconds of the most recent report or CSV export
pub const SETTING_LAST_EXPORT: &str = "last_export_timestamp";

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    pub fn delete_setting(&self, key: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM settings WHERE key = ?", params![key])?;
        Ok(deleted > 0)
    }

    /// Saved user name, if any
    pub fn user_name(&self) -> Result<Option<String>> {
        Ok(self
            .get_setting(SETTING_USER_NAME)?
            .filter(|name| !name.is_empty()))
    }

    /// Save the user name trimmed; an empty name clears it
    pub fn set_user_name(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            self.delete_setting(SETTING_USER_NAME)?;
        } else {
            self.set_setting(SETTING_USER_NAME, name)?;
        }
        Ok(())
    }

    pub fn last_export_timestamp(&self) -> Result<Option<i64>> {
        Ok(self
            .get_setting(SETTING_LAST_EXPORT)?
            .and_then(|v| v.parse().ok()))
    }

    pub fn record_export(&self, timestamp: i64) -> Result<()> {
        self.set_setting(SETTING_LAST_EXPORT, &timestamp.to_string())
    }
}
