//! Reading commands (add, list, show, edit, delete)

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use glyco_core::models::{format_timestamp, now_millis};
use glyco_core::{
    db::Database, DateRange, NewReading, Reading, ReadingFilter, ReadingType, ReadingUpdate,
};

use super::truncate;

const LIST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a local date/time ("YYYY-MM-DD HH:MM", "YYYY-MM-DDTHH:MM" or
/// "YYYY-MM-DD") into epoch milliseconds
pub fn parse_local_time(input: &str) -> Result<i64> {
    let input = input.trim();
    let naive = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .with_context(|| {
            format!(
                "Invalid time '{}'. Use YYYY-MM-DD HH:MM (local time)",
                input
            )
        })?;

    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("Time '{}' does not exist in the local timezone", input))?;
    Ok(local.timestamp_millis())
}

fn print_reading_row(reading: &Reading) {
    let status = reading.status();
    let notes = reading
        .notes
        .as_deref()
        .map(|n| truncate(n, 30))
        .unwrap_or_default();
    println!(
        "{:<36}  {}  {:>6}  {:<9} {:<7} {}",
        reading.id,
        format_timestamp(reading.timestamp, LIST_TIME_FORMAT),
        reading.value,
        reading.reading_type,
        status,
        notes
    );
}

pub fn cmd_add(
    db: &Database,
    value: f64,
    reading_type: ReadingType,
    at: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let mut new = NewReading::new(reading_type, value);
    if let Some(at) = at {
        new = new.at(parse_local_time(at)?);
    }
    if let Some(notes) = notes {
        new = new.with_notes(notes);
    }

    let reading = db.insert_reading(&new).context("Failed to save reading")?;
    let status = reading.status();

    println!(
        "✅ Saved {} reading: {} mg/dL ({})",
        reading.reading_type, reading.value, status
    );
    println!("   ID: {}", reading.id);
    println!(
        "   Time: {}",
        format_timestamp(reading.timestamp, LIST_TIME_FORMAT)
    );
    if let Some(ref notes) = reading.notes {
        println!("   Notes: {}", notes);
    }

    Ok(())
}

pub fn cmd_list(
    db: &Database,
    reading_type: Option<ReadingType>,
    range: DateRange,
    limit: usize,
) -> Result<()> {
    let filter = ReadingFilter {
        reading_type,
        range,
    };
    let readings = db.list_readings_filtered(&filter, now_millis())?;

    if readings.is_empty() {
        if filter.active_count() > 0 {
            println!("No readings match the current filters.");
        } else {
            println!("No readings yet. Add one with: glyco add <value>");
        }
        return Ok(());
    }

    println!();
    println!(
        "{:<36}  {:<16}  {:>6}  {:<9} {:<7} NOTES",
        "ID", "TIME", "MG/DL", "TYPE", "STATUS"
    );
    println!("{}", "-".repeat(100));
    for reading in readings.iter().take(limit) {
        print_reading_row(reading);
    }

    if readings.len() > limit {
        println!();
        println!(
            "Showing {} of {} readings. Use --limit to see more.",
            limit,
            readings.len()
        );
    }

    Ok(())
}

pub fn cmd_show(db: &Database, id: &str) -> Result<()> {
    let reading = db
        .get_reading(id)?
        .ok_or_else(|| anyhow::anyhow!("Reading not found: {}", id))?;

    println!();
    println!("   ID:     {}", reading.id);
    println!(
        "   Time:   {}",
        format_timestamp(reading.timestamp, LIST_TIME_FORMAT)
    );
    println!("   Value:  {} mg/dL", reading.value);
    println!("   Type:   {}", reading.reading_type);
    println!("   Status: {}", reading.status());
    println!("   Notes:  {}", reading.notes.as_deref().unwrap_or("-"));
    println!();

    Ok(())
}

pub fn cmd_edit(
    db: &Database,
    id: &str,
    value: Option<f64>,
    reading_type: Option<ReadingType>,
    at: Option<&str>,
    notes: Option<String>,
) -> Result<()> {
    let update = ReadingUpdate {
        reading_type,
        value,
        timestamp: at.map(parse_local_time).transpose()?,
        notes,
    };
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass --value, --type, --at or --notes.");
    }

    let reading = db
        .update_reading(id, &update)
        .context("Failed to update reading")?
        .ok_or_else(|| anyhow::anyhow!("Reading not found: {}", id))?;

    println!(
        "✅ Updated reading {}: {} mg/dL {} ({})",
        reading.id,
        reading.value,
        reading.reading_type,
        reading.status()
    );

    Ok(())
}

pub fn cmd_delete(db: &Database, id: &str) -> Result<()> {
    if !db.delete_reading(id)? {
        anyhow::bail!("Reading not found: {}", id);
    }
    println!("🗑️  Deleted reading {}", id);
    Ok(())
}
