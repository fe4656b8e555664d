//! Backup system with pluggable destinations
//!
//! A backup is a `BackupData` JSON document (see `export`) holding every
//! reading, written through a `BackupDestination`. `LocalDestination`
//! gzip-compresses it into a local directory.
//!
//! File naming: `glyco-YYYY-MM-DD-HHMMSS.json.gz`

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

mod local;

pub use local::LocalDestination;

const BACKUP_PREFIX: &str = "glyco-";
const BACKUP_SUFFIX: &str = ".json.gz";

/// Information about a stored backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub name: String,
    /// Full path or remote key
    pub path: String,
    /// Size in bytes
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub compressed: bool,
}

/// Result of a backup operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupResult {
    pub info: BackupInfo,
    /// Number of readings in the backup
    pub readings: usize,
}

/// Result of a prune operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneResult {
    pub deleted_count: usize,
    pub deleted_names: Vec<String>,
    pub retained_count: usize,
    /// Total bytes freed
    pub bytes_freed: u64,
}

/// How many backups to keep when pruning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Most recent backups to keep
    pub keep: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { keep: 7 }
    }
}

impl RetentionPolicy {
    /// Keep the last N backups
    pub fn keep_last(n: usize) -> Self {
        Self { keep: n }
    }
}

/// Trait for backup storage destinations
pub trait BackupDestination: Send + Sync {
    /// Human-readable name for this destination
    fn name(&self) -> &str;

    /// Store a local file under `backup_name`, returning the stored name
    fn store(&self, local_path: &Path, backup_name: &str) -> Result<String>;

    /// Copy a backup to the given local path
    fn retrieve(&self, backup_name: &str, local_path: &Path) -> Result<()>;

    /// List all backups, newest first
    fn list(&self) -> Result<Vec<BackupInfo>>;

    fn delete(&self, backup_name: &str) -> Result<()>;

    /// Apply retention policy and delete old backups
    fn prune(&self, policy: &RetentionPolicy) -> Result<PruneResult> {
        let mut backups = self.list()?;
        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut deleted_names = Vec::new();
        let mut bytes_freed = 0u64;

        for backup in backups.iter().skip(policy.keep) {
            if let Err(e) = self.delete(&backup.name) {
                tracing::warn!("Failed to delete backup {}: {}", backup.name, e);
                continue;
            }
            bytes_freed += backup.size;
            deleted_names.push(backup.name.clone());
        }

        let retained_count = backups.len().saturating_sub(deleted_names.len());

        Ok(PruneResult {
            deleted_count: deleted_names.len(),
            deleted_names,
            retained_count,
            bytes_freed,
        })
    }
}

/// Generate a backup filename with the current time
pub fn generate_backup_name() -> String {
    backup_name_at(Utc::now())
}

pub fn backup_name_at(time: DateTime<Utc>) -> String {
    format!(
        "{}{}{}",
        BACKUP_PREFIX,
        time.format("%Y-%m-%d-%H%M%S"),
        BACKUP_SUFFIX
    )
}

/// Parse backup creation time from filename
pub fn parse_backup_time(name: &str) -> Option<DateTime<Utc>> {
    let name = name.strip_prefix(BACKUP_PREFIX)?;
    let name = name
        .strip_suffix(BACKUP_SUFFIX)
        .or_else(|| name.strip_suffix(".json"))?;

    chrono::NaiveDateTime::parse_from_str(name, "%Y-%m-%d-%H%M%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Reject names that could escape the backup directory
pub fn validate_backup_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || !name.starts_with(BACKUP_PREFIX)
    {
        return Err(Error::InvalidData(format!("Invalid backup name: {}", name)));
    }
    Ok(())
}

/// Default backup directory
pub fn default_backup_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glyco")
        .join("backups")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_backup_name() {
        let name = generate_backup_name();
        assert!(name.starts_with("glyco-"));
        assert!(name.ends_with(".json.gz"));
        assert!(parse_backup_time(&name).is_some());
    }

    #[test]
    fn test_parse_backup_time() {
        let time = parse_backup_time("glyco-2024-01-15-143022.json.gz").unwrap();
        assert_eq!(
            time.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-01-15 14:30:22"
        );
    }

    #[test]
    fn test_parse_backup_time_invalid() {
        assert!(parse_backup_time("invalid.json").is_none());
        assert!(parse_backup_time("glyco-baddate.json.gz").is_none());
        assert!(parse_backup_time("other-2024-01-15-143022.db.gz").is_none());
    }

    #[test]
    fn test_validate_backup_name() {
        assert!(validate_backup_name("glyco-2024-01-15-143022.json.gz").is_ok());
        assert!(validate_backup_name("../glyco-x.json.gz").is_err());
        assert!(validate_backup_name("glyco-../../etc/passwd").is_err());
        assert!(validate_backup_name("other.json.gz").is_err());
    }

    #[test]
    fn test_default_retention_policy() {
        assert_eq!(RetentionPolicy::default().keep, 7);
        assert_eq!(RetentionPolicy::keep_last(3).keep, 3);
    }
}
