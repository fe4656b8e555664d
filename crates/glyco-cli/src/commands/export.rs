//! Export and import commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glyco_core::db::Database;

/// Write to a file when given, otherwise to stdout
fn write_output(content: &str, output: Option<&Path>, what: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Exported {} to {}", what, path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

pub fn cmd_export_csv(db: &Database, output: Option<PathBuf>) -> Result<()> {
    let csv = db.export_csv().context("Failed to export CSV")?;
    write_output(&csv, output.as_deref(), "CSV")
}

pub fn cmd_export_report(db: &Database, output: Option<PathBuf>) -> Result<()> {
    let html = db.export_report().context("Failed to render report")?;
    write_output(&html, output.as_deref(), "report")
}

pub fn cmd_export_json(db: &Database, output: Option<PathBuf>) -> Result<()> {
    let json = db
        .export_backup_json()
        .context("Failed to export JSON backup")?;
    write_output(&json, output.as_deref(), "JSON backup")
}

pub fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    println!("📥 Importing {}...", file.display());
    let result = db
        .import_backup_json(&json)
        .context("Failed to import backup")?;

    println!("✅ Import complete");
    println!("   Restored: {}", result.restored);
    if result.skipped > 0 {
        println!("   Skipped (already present): {}", result.skipped);
    }

    Ok(())
}
