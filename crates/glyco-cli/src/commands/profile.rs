//! Profile commands (show, set-name)

use anyhow::{Context, Result};
use glyco_core::db::Database;
use glyco_core::models::{format_timestamp, now_millis};
use glyco_core::profile::local_hour;

pub fn cmd_profile_show(db: &Database) -> Result<()> {
    let profile = db.profile(local_hour(now_millis()))?;

    println!();
    println!("   {}", profile.greeting);
    println!();
    println!("   Name:        {}", profile.name.as_deref().unwrap_or("(not set)"));
    match profile.last_export_timestamp {
        Some(ts) => println!("   Last export: {}", format_timestamp(ts, "%Y-%m-%d %H:%M")),
        None => println!("   Last export: never"),
    }
    println!();

    Ok(())
}

pub fn cmd_profile_set_name(db: &Database, name: &str) -> Result<()> {
    db.set_user_name(name).context("Failed to save name")?;

    match db.user_name()? {
        Some(saved) => println!("✅ Name set to {}", saved),
        None => println!("✅ Name cleared"),
    }

    Ok(())
}
