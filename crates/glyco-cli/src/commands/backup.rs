//! Backup management commands

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use glyco_core::backup::{default_backup_dir, BackupDestination, LocalDestination, RetentionPolicy};
use glyco_core::db::Database;

fn open_destination(dir: Option<PathBuf>) -> Result<(PathBuf, LocalDestination)> {
    let backup_dir = dir.unwrap_or_else(default_backup_dir);
    let destination = LocalDestination::new(&backup_dir).with_context(|| {
        format!(
            "Failed to access backup directory: {}",
            backup_dir.display()
        )
    })?;
    Ok((backup_dir, destination))
}

/// Create a new backup
pub fn cmd_backup_create(db: &Database, name: Option<&str>, dir: Option<PathBuf>) -> Result<()> {
    let (_, destination) = open_destination(dir)?;

    println!("Creating backup...");

    let result = db
        .create_backup(&destination, name)
        .context("Failed to create backup")?;

    println!("✅ Backup created: {}", result.info.name);
    println!("   Location: {}", result.info.path);
    println!("   Size: {}", format_size(result.info.size));
    println!("   Readings: {}", result.readings);
    if result.info.compressed {
        println!("   📦 Compressed");
    }

    Ok(())
}

/// List available backups
pub fn cmd_backup_list(dir: Option<PathBuf>) -> Result<()> {
    let backup_dir = dir.unwrap_or_else(default_backup_dir);

    if !backup_dir.exists() {
        println!("No backups found (backup directory does not exist)");
        println!("Directory: {}", backup_dir.display());
        return Ok(());
    }

    let (backup_dir, destination) = open_destination(Some(backup_dir))?;
    let backups = destination.list().context("Failed to list backups")?;

    if backups.is_empty() {
        println!("No backups found");
        println!("Directory: {}", backup_dir.display());
        return Ok(());
    }

    println!("Available backups ({}):", backup_dir.display());
    println!();
    println!("{:<35} {:>12} {:>18}", "NAME", "SIZE", "CREATED");
    println!("{}", "-".repeat(67));

    for backup in backups {
        let created = backup.created_at.format("%Y-%m-%d %H:%M");
        let flags = if backup.compressed { "📦" } else { "" };
        println!(
            "{:<35} {:>12} {:>18} {}",
            backup.name,
            format_size(backup.size),
            created,
            flags
        );
    }

    Ok(())
}

/// Merge a backup into the current database
pub fn cmd_backup_restore(db: &Database, name: &str, dir: Option<PathBuf>) -> Result<()> {
    let (_, destination) = open_destination(dir)?;

    println!("Restoring from backup: {}", name);

    let result = db
        .restore_backup(&destination, name)
        .context("Failed to restore backup")?;

    println!("✅ Restore complete");
    println!("   Restored: {}", result.restored);
    println!("   Skipped (already present): {}", result.skipped);
    println!("   Total readings: {}", db.count_readings()?);

    Ok(())
}

/// Prune old backups according to retention policy
pub fn cmd_backup_prune(keep: usize, dir: Option<PathBuf>, yes: bool) -> Result<()> {
    let (_, destination) = open_destination(dir)?;
    let backups = destination.list()?;

    if backups.len() <= keep {
        println!(
            "Nothing to prune. {} backup(s) found, keeping {}.",
            backups.len(),
            keep
        );
        return Ok(());
    }

    let to_delete = backups.len() - keep;

    if !yes {
        println!(
            "This will delete {} backup(s), keeping the {} most recent:",
            to_delete, keep
        );
        println!();
        for backup in backups.iter().skip(keep) {
            println!("  - {} ({})", backup.name, format_size(backup.size));
        }
        println!();
        print!("Continue? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled");
            return Ok(());
        }
    }

    let result = destination
        .prune(&RetentionPolicy::keep_last(keep))
        .context("Failed to prune backups")?;

    println!("✅ Pruned {} backup(s)", result.deleted_count);
    println!("   Freed: {}", format_size(result.bytes_freed));
    println!("   Remaining: {} backup(s)", result.retained_count);

    if !result.deleted_names.is_empty() {
        println!();
        println!("Deleted:");
        for name in &result.deleted_names {
            println!("  - {}", name);
        }
    }

    Ok(())
}

/// Format a byte size as human-readable
pub(crate) fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
