//! Local filesystem backup destination

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

use super::{parse_backup_time, validate_backup_name, BackupDestination, BackupInfo, BACKUP_PREFIX};
use crate::error::{Error, Result};

/// Backups stored as files in one directory
pub struct LocalDestination {
    backup_dir: PathBuf,
}

impl LocalDestination {
    /// Open a backup directory, creating it if needed
    pub fn new(backup_dir: impl Into<PathBuf>) -> Result<Self> {
        let backup_dir = backup_dir.into();

        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir).map_err(|e| {
                Error::Backup(format!(
                    "Failed to create backup directory {}: {}",
                    backup_dir.display(),
                    e
                ))
            })?;
            info!("Created backup directory: {}", backup_dir.display());
        }

        Ok(Self { backup_dir })
    }

    fn backup_path(&self, name: &str) -> Result<PathBuf> {
        validate_backup_name(name)?;
        Ok(self.backup_dir.join(name))
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

impl BackupDestination for LocalDestination {
    fn name(&self) -> &str {
        "local"
    }

    fn store(&self, local_path: &Path, backup_name: &str) -> Result<String> {
        let dest_path = self.backup_path(backup_name)?;

        if dest_path.exists() {
            return Err(Error::Backup(format!(
                "Backup already exists: {}",
                dest_path.display()
            )));
        }

        if backup_name.ends_with(".gz") {
            let mut reader = BufReader::new(File::open(local_path)?);
            let writer = BufWriter::new(File::create(&dest_path)?);
            let mut encoder = GzEncoder::new(writer, Compression::default());
            io::copy(&mut reader, &mut encoder)?;
            encoder.finish()?.flush()?;
        } else {
            fs::copy(local_path, &dest_path)?;
        }

        info!("Stored backup: {}", dest_path.display());
        Ok(backup_name.to_string())
    }

    fn retrieve(&self, backup_name: &str, local_path: &Path) -> Result<()> {
        let source_path = self.backup_path(backup_name)?;

        if !source_path.exists() {
            return Err(Error::NotFound(format!("Backup {}", backup_name)));
        }

        if backup_name.ends_with(".gz") {
            let mut decoder = GzDecoder::new(BufReader::new(File::open(&source_path)?));
            let mut writer = BufWriter::new(File::create(local_path)?);
            io::copy(&mut decoder, &mut writer)?;
            writer.flush()?;
        } else {
            fs::copy(&source_path, local_path)?;
        }

        info!("Retrieved backup to: {}", local_path.display());
        Ok(())
    }

    fn list(&self) -> Result<Vec<BackupInfo>> {
        let mut backups = Vec::new();

        if !self.backup_dir.exists() {
            return Ok(backups);
        }

        for entry in fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            let path = entry.path();

            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) if name.starts_with(BACKUP_PREFIX) => name.to_string(),
                _ => continue,
            };

            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let created_at = parse_backup_time(&file_name).unwrap_or_else(Utc::now);
            let compressed = file_name.ends_with(".gz");

            backups.push(BackupInfo {
                name: file_name,
                path: path.to_string_lossy().to_string(),
                size: metadata.len(),
                created_at,
                compressed,
            });
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    fn delete(&self, backup_name: &str) -> Result<()> {
        let path = self.backup_path(backup_name)?;

        if !path.exists() {
            return Err(Error::NotFound(format!("Backup {}", backup_name)));
        }

        fs::remove_file(&path)?;
        info!("Deleted backup: {}", path.display());
        Ok(())
    }
}
