//! Printable HTML report
//!
//! Sections: weekly insight, all-time statistics, last-14-day analysis with
//! range percentages, the 30 most recent readings, and a medical disclaimer.

use std::fmt::Write;

use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::insights::get_weekly_insight;
use crate::models::{format_timestamp, now_millis, GlucoseStatus, Reading, ReadingType};
use crate::stats::{compute_stats, detailed_stats, StatsSnapshot};

/// Days covered by the recent analysis section
pub const REPORT_WINDOW_DAYS: u32 = 14;
/// Readings listed in the table
pub const REPORT_RECENT_READINGS: usize = 30;

const DATE_FORMAT: &str = "%B %-d, %Y, %I:%M %p";

const STYLE: &str = r#"
body { font-family: -apple-system, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; padding: 20px; color: #333; }
.header { text-align: center; border-bottom: 3px solid #4A90E2; padding-bottom: 20px; margin-bottom: 30px; }
.header h1 { color: #4A90E2; }
.section { margin-bottom: 30px; page-break-inside: avoid; }
.section-title { font-size: 20px; font-weight: 600; border-bottom: 2px solid #e0e0e0; padding-bottom: 8px; margin-bottom: 15px; }
.insight-box { background: #E8F5E9; border-left: 4px solid #4CAF50; padding: 15px; }
.stats-grid, .percentage-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 15px; }
.stat-card, .percentage-item { background: #f8f8f8; padding: 15px; border-radius: 8px; text-align: center; }
.stat-value { font-size: 28px; font-weight: bold; }
.stat-label, .stat-unit, .percentage-label { font-size: 12px; color: #666; }
.readings-table { width: 100%; border-collapse: collapse; }
.readings-table th { background: #4A90E2; color: white; padding: 10px; text-align: left; }
.readings-table td { padding: 10px; border-bottom: 1px solid #e0e0e0; }
.badge { display: inline-block; padding: 4px 8px; border-radius: 4px; font-size: 10px; font-weight: 600; }
.status-normal { background: #4CAF50; color: white; }
.status-high { background: #F44336; color: white; }
.status-low { background: #FF9800; color: white; }
.type-fasting { background: #E1BEE7; color: #6A1B9A; }
.type-postmeal { background: #FFE0B2; color: #E65100; }
.type-random { background: #BBDEFB; color: #0D47A1; }
.disclaimer { background: #FFF9E6; border-left: 4px solid #FFC107; padding: 15px; font-size: 11px; color: #666; }
.footer { margin-top: 40px; text-align: center; color: #999; font-size: 11px; }
"#;

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Value for a stat card; missing or zero shows as `--`
fn stat_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => v.to_string(),
        _ => "--".to_string(),
    }
}

fn type_class(reading_type: ReadingType) -> &'static str {
    match reading_type {
        ReadingType::Fasting => "type-fasting",
        ReadingType::PostMeal => "type-postmeal",
        ReadingType::Random => "type-random",
    }
}

fn status_class(status: GlucoseStatus) -> &'static str {
    match status {
        GlucoseStatus::Low => "status-low",
        GlucoseStatus::Normal => "status-normal",
        GlucoseStatus::High => "status-high",
    }
}

fn write_stat_cards(html: &mut String, stats: &StatsSnapshot) {
    let average = (stats.average != 0).then_some(stats.average as f64);
    let cards = [
        ("Average", stat_value(average), "#333"),
        (
            "Highest",
            stat_value(stats.highest.as_ref().map(|r| r.value)),
            "#F44336",
        ),
        (
            "Lowest",
            stat_value(stats.lowest.as_ref().map(|r| r.value)),
            "#FF9800",
        ),
    ];

    html.push_str("<div class=\"stats-grid\">\n");
    for (label, value, color) in cards {
        let _ = writeln!(
            html,
            "<div class=\"stat-card\"><div class=\"stat-label\">{}</div>\
             <div class=\"stat-value\" style=\"color: {};\">{}</div>\
             <div class=\"stat-unit\">mg/dL</div></div>",
            label, color, value
        );
    }
    html.push_str("</div>\n");
}

fn write_reading_row(html: &mut String, reading: &Reading) {
    let status = reading.status();
    let notes = reading
        .notes
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "-".to_string());

    let _ = writeln!(
        html,
        "<tr><td>{}</td>\
         <td><span style=\"color: {}; font-weight: 600;\">{} mg/dL</span></td>\
         <td><span class=\"badge {}\">{}</span></td>\
         <td><span class=\"badge {}\">{}</span></td>\
         <td>{}</td></tr>",
        format_timestamp(reading.timestamp, DATE_FORMAT),
        status.color(),
        reading.value,
        status_class(status),
        status,
        type_class(reading.reading_type),
        reading.reading_type,
        notes
    );
}

/// Render the HTML report for a set of readings
///
/// `reference_time` anchors the weekly insight and the 14-day window.
pub fn render_report(readings: &[Reading], reference_time: i64) -> Result<String> {
    if readings.is_empty() {
        return Err(Error::InvalidData("No readings to export".to_string()));
    }

    let mut sorted = readings.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let all_time = compute_stats(&sorted);
    let recent = detailed_stats(&sorted, REPORT_WINDOW_DAYS, reference_time).stats;
    let weekly = get_weekly_insight(&sorted, reference_time);

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>Glyco Report</title>\n<style>{}</style>\n</head>\n<body>\n",
        STYLE
    );
    let _ = writeln!(
        html,
        "<div class=\"header\"><h1>📊 Glyco Report</h1>\
         <div>Glucose Tracking Report</div>\
         <div>Generated on {}</div></div>",
        format_timestamp(reference_time, DATE_FORMAT)
    );

    let _ = writeln!(
        html,
        "<div class=\"section\"><div class=\"section-title\">🧠 Weekly Insight</div>\
         <div class=\"insight-box\"><p>{}</p></div></div>",
        escape_html(&weekly)
    );

    html.push_str(
        "<div class=\"section\"><div class=\"section-title\">📈 Overall Statistics</div>\n",
    );
    write_stat_cards(&mut html, &all_time);
    let _ = writeln!(
        html,
        "<div style=\"text-align: center;\">Total Readings: {}</div></div>",
        all_time.total
    );

    let _ = writeln!(
        html,
        "<div class=\"section\"><div class=\"section-title\">📊 Last {} Days Analysis</div>",
        REPORT_WINDOW_DAYS
    );
    write_stat_cards(&mut html, &recent);
    if recent.total > 0 {
        html.push_str("<div class=\"percentage-grid\">\n");
        for (label, percent, color) in [
            ("In Range", recent.in_range_percent(), GlucoseStatus::Normal.color()),
            ("High", recent.high_percent(), GlucoseStatus::High.color()),
            ("Low", recent.low_percent(), GlucoseStatus::Low.color()),
        ] {
            let _ = writeln!(
                html,
                "<div class=\"percentage-item\"><div class=\"stat-value\" style=\"color: {};\">{}%</div>\
                 <div class=\"percentage-label\">{}</div></div>",
                color, percent, label
            );
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");

    let _ = writeln!(
        html,
        "<div class=\"section\"><div class=\"section-title\">📋 Recent Readings (Last {})</div>\n\
         <table class=\"readings-table\"><thead><tr><th>Date &amp; Time</th><th>Glucose</th>\
         <th>Status</th><th>Type</th><th>Notes</th></tr></thead><tbody>",
        REPORT_RECENT_READINGS
    );
    for reading in sorted.iter().take(REPORT_RECENT_READINGS) {
        write_reading_row(&mut html, reading);
    }
    html.push_str("</tbody></table></div>\n");

    html.push_str(
        "<div class=\"disclaimer\"><strong>Disclaimer:</strong> This report is for informational \
         purposes only and should not be used as a substitute for professional medical advice. \
         Always consult your healthcare provider for medical decisions.</div>\n",
    );
    let _ = writeln!(
        html,
        "<div class=\"footer\"><p>Generated by Glyco v{}</p></div>\n</body>\n</html>",
        env!("CARGO_PKG_VERSION")
    );

    Ok(html)
}

impl Database {
    /// Render the report over every stored reading and record the export time
    pub fn export_report(&self) -> Result<String> {
        let readings = self.list_readings()?;
        let now = now_millis();
        let html = render_report(&readings, now)?;
        self.record_export(now)?;
        info!(readings = readings.len(), "Exported report");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MS_PER_DAY;
    use crate::test_utils::{reading_at, typed_reading_at, REFERENCE_TIME};

    #[test]
    fn test_empty_report_is_an_error() {
        let err = render_report(&[], REFERENCE_TIME).unwrap_err();
        assert!(err.to_string().contains("No readings to export"));
    }

    #[test]
    fn test_report_sections() {
        let readings = vec![
            typed_reading_at(ReadingType::Fasting, 95.0, REFERENCE_TIME - MS_PER_DAY),
            typed_reading_at(ReadingType::PostMeal, 180.0, REFERENCE_TIME - 2 * MS_PER_DAY),
            reading_at(60.0, REFERENCE_TIME - 3 * MS_PER_DAY),
        ];
        let html = render_report(&readings, REFERENCE_TIME).unwrap();

        assert!(html.contains("Weekly Insight"));
        assert!(html.contains("Overall Statistics"));
        assert!(html.contains("Last 14 Days Analysis"));
        assert!(html.contains("Total Readings: 3"));
        assert!(html.contains("33%"));
        assert!(html.contains("type-postmeal"));
        assert!(html.contains("status-low"));
        assert!(html.contains("Disclaimer"));
    }

    #[test]
    fn test_old_readings_render_placeholders() {
        let readings = vec![reading_at(100.0, REFERENCE_TIME - 40 * MS_PER_DAY)];
        let html = render_report(&readings, REFERENCE_TIME).unwrap();
        assert!(html.contains(">--<"));
        assert!(!html.contains("class=\"percentage-item\""));
    }

    #[test]
    fn test_table_limited_and_escaped() {
        let mut readings: Vec<Reading> = (0..40)
            .map(|i| reading_at(100.0, REFERENCE_TIME - i * 1000))
            .collect();
        readings[0].notes = Some("<b>pizza</b>".to_string());

        let html = render_report(&readings, REFERENCE_TIME).unwrap();
        assert_eq!(html.matches("<tr><td>").count(), REPORT_RECENT_READINGS);
        assert!(html.contains("&lt;b&gt;pizza&lt;/b&gt;"));
        assert!(!html.contains("<b>pizza</b>"));
    }

    #[test]
    fn test_export_report_records_timestamp() {
        let db = Database::in_memory().unwrap();
        assert!(db.export_report().is_err());

        db.insert_reading(&crate::models::NewReading::new(ReadingType::Random, 110.0))
            .unwrap();
        db.export_report().unwrap();
        assert!(db.last_export_timestamp().unwrap().is_some());
    }
}
