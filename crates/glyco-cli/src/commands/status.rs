//! Status-related command implementations (status, dashboard, reset)

use std::path::Path;

use anyhow::{Context, Result};
use glyco_core::db::Database;
use glyco_core::models::{format_timestamp, now_millis};
use glyco_core::profile::local_hour;
use glyco_core::build_dashboard;

use super::insights::print_stats;
use super::open_db;

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use glyco_core::db::DB_KEY_ENV;
    use std::fs;

    println!();
    println!("📊 Glyco Status");
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                if let Ok(count) = db.count_readings() {
                    println!();
                    println!("   Readings: {}", count);
                }
                if let Ok(Some(ts)) = db.last_export_timestamp() {
                    println!(
                        "   Last export: {}",
                        format_timestamp(ts, "%Y-%m-%d %H:%M")
                    );
                }
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                } else if has_key {
                    println!("      (Check if {} is correct)", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    Ok(())
}

pub fn cmd_dashboard(db: &Database, json: bool) -> Result<()> {
    let readings = db.list_readings()?;
    let name = db.user_name()?;
    let now = now_millis();
    let dashboard = build_dashboard(&readings, name.as_deref(), now, local_hour(now));

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           🩸 Glyco Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", dashboard.greeting);
    println!();

    match dashboard.latest {
        Some(ref latest) => println!(
            "  Latest: {} mg/dL ({}, {}) {}",
            latest.reading.value,
            latest.reading.reading_type,
            latest.status,
            format_timestamp(latest.reading.timestamp, "%Y-%m-%d %H:%M")
        ),
        None => println!("  Latest: --"),
    }
    println!(
        "  Trend:  {} {}",
        dashboard.trend_emoji, dashboard.trend
    );
    println!();

    print_stats("Last 7 Days", &dashboard.last_7_days);
    println!();
    print_stats("All Time", &dashboard.all_time);
    println!();

    println!("  💡 {}", dashboard.insight.message);
    println!("  🧠 {}", dashboard.weekly.message);
    println!();

    Ok(())
}

pub fn cmd_reset(db_path: &Path, yes: bool, no_encrypt: bool) -> Result<()> {
    use std::io::{self, Write};

    if !db_path.exists() {
        anyhow::bail!("Database not found: {}", db_path.display());
    }

    if !yes {
        print!("⚠️  This will delete all readings and profile settings.\n\n");
        print!("Are you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let db = open_db(db_path, no_encrypt)?;
    db.reset().context("Failed to reset database")?;

    println!("✅ Database reset complete.");
    println!("   Cleared: readings, name, export history");

    Ok(())
}
