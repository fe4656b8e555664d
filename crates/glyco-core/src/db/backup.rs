//! Backup and restore of readings through a `BackupDestination`
//!
//! The backup is the JSON `BackupData` document written to a temp file and
//! handed to the destination, which compresses it.

use std::fs;

use tempfile::NamedTempFile;
use tracing::info;

use super::Database;
use crate::backup::{generate_backup_name, BackupDestination, BackupResult};
use crate::error::{Error, Result};
use crate::export::{BackupData, RestoreResult};

impl Database {
    /// Store a backup of every reading
    ///
    /// Fails with "No readings to backup" when the store is empty.
    pub fn create_backup(
        &self,
        destination: &dyn BackupDestination,
        backup_name: Option<&str>,
    ) -> Result<BackupResult> {
        let data = self.export_backup_data()?;

        let name = backup_name
            .map(String::from)
            .unwrap_or_else(generate_backup_name);

        let temp = NamedTempFile::new()
            .map_err(|e| Error::Backup(format!("Failed to create temp file: {}", e)))?;
        fs::write(temp.path(), data.to_json()?)?;

        let stored_name = destination.store(temp.path(), &name)?;

        let info = destination
            .list()?
            .into_iter()
            .find(|b| b.name == stored_name)
            .ok_or_else(|| Error::Backup("Backup not found after storing".to_string()))?;

        info!(
            "Backup complete: {} ({} bytes, {} readings)",
            info.name, info.size, data.total_readings
        );

        Ok(BackupResult {
            info,
            readings: data.total_readings,
        })
    }

    /// Merge a stored backup into this database
    pub fn restore_backup(
        &self,
        destination: &dyn BackupDestination,
        backup_name: &str,
    ) -> Result<RestoreResult> {
        let temp = NamedTempFile::new()
            .map_err(|e| Error::Backup(format!("Failed to create temp file: {}", e)))?;
        destination.retrieve(backup_name, temp.path())?;

        let json = fs::read_to_string(temp.path())?;
        let result = self.import_backup_json(&json)?;

        info!(
            "Restored {} from {}: {} added, {} skipped",
            backup_name,
            destination.name(),
            result.restored,
            result.skipped
        );
        Ok(result)
    }
}
