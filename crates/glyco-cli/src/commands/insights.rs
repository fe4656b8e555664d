//! Statistics and insight commands (stats, insight, trend, weekly)

use anyhow::Result;
use glyco_core::models::now_millis;
use glyco_core::{
    compute_stats, db::Database, detailed_stats, evaluate_insight, evaluate_weekly_insight,
    get_trend, ReadingType, Severity, StatsSnapshot,
};

/// Print a stats block, using `--` for empty values
pub(crate) fn print_stats(title: &str, stats: &StatsSnapshot) {
    let value_or_dash = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "--".into());

    println!("   {}", title);
    println!("   ─────────────────────────────");
    if stats.total == 0 {
        println!("   No readings");
        return;
    }
    println!("   Average:  {} mg/dL", stats.average);
    println!(
        "   Highest:  {} mg/dL",
        value_or_dash(stats.highest.as_ref().map(|r| r.value))
    );
    println!(
        "   Lowest:   {} mg/dL",
        value_or_dash(stats.lowest.as_ref().map(|r| r.value))
    );
    println!("   Readings: {}", stats.total);
    println!(
        "   In range: {} ({}%)   High: {} ({}%)   Low: {} ({}%)",
        stats.in_range,
        stats.in_range_percent(),
        stats.high_count,
        stats.high_percent(),
        stats.low_count,
        stats.low_percent()
    );
}

pub fn cmd_stats(db: &Database, days: Option<u32>, json: bool) -> Result<()> {
    let readings = db.list_readings()?;

    match days {
        None => {
            let stats = compute_stats(&readings);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }
            println!();
            print_stats("📊 All Time", &stats);
        }
        Some(days) => {
            let detailed = detailed_stats(&readings, days, now_millis());
            if json {
                println!("{}", serde_json::to_string_pretty(&detailed)?);
                return Ok(());
            }
            println!();
            print_stats(&format!("📊 Last {} Days", days), &detailed.stats);
            if detailed.stats.total > 0 {
                println!();
                for reading_type in ReadingType::ALL {
                    let bucket = detailed.by_type.get(reading_type);
                    let stats = compute_stats(bucket);
                    if stats.total > 0 {
                        println!(
                            "   {:<10} {:>3} readings, average {} mg/dL",
                            reading_type, stats.total, stats.average
                        );
                    } else {
                        println!("   {:<10}   0 readings", reading_type);
                    }
                }
            }
        }
    }
    println!();

    Ok(())
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "💡",
        Severity::Attention => "🔎",
        Severity::Warning => "⚠️ ",
    }
}

pub fn cmd_insight(db: &Database) -> Result<()> {
    let readings = db.list_readings()?;
    let average = compute_stats(&readings).average as f64;
    let insight = evaluate_insight(&readings, readings.first(), average);

    println!();
    println!("{} {}", severity_icon(insight.severity), insight.message);
    println!();

    Ok(())
}

pub fn cmd_trend(db: &Database) -> Result<()> {
    let readings = db.list_readings()?;
    let trend = get_trend(&readings);

    if readings.len() < 3 {
        println!(
            "{} Trend: {} (needs at least 3 readings, have {})",
            trend.emoji(),
            trend,
            readings.len()
        );
    } else {
        println!("{} Trend: {}", trend.emoji(), trend);
    }

    Ok(())
}

pub fn cmd_weekly(db: &Database) -> Result<()> {
    let readings = db.list_readings()?;
    let weekly = evaluate_weekly_insight(&readings, now_millis());

    println!();
    println!("🧠 {}", weekly.message);
    if let (Some(current), Some(previous)) = (weekly.current_average, weekly.previous_average) {
        println!(
            "   This week: {} mg/dL ({} readings)   Last week: {} mg/dL",
            current, weekly.current_count, previous
        );
    } else if let Some(current) = weekly.current_average {
        println!(
            "   This week: {} mg/dL ({} readings)",
            current, weekly.current_count
        );
    }
    println!();

    Ok(())
}
