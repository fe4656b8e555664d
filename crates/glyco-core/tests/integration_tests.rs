//! Integration tests for glyco-core
//!
//! These tests exercise the full store → stats → insights workflow.

use glyco_core::{
    build_dashboard, compute_stats, compute_windowed_stats, db::Database, detailed_stats,
    generate_insight, get_trend, get_weekly_insight, BackupDestination, InsightKind,
    LocalDestination, NewReading, ReadingType, ReadingUpdate, RetentionPolicy, Trend,
};

const DAY: i64 = 24 * 60 * 60 * 1000;
/// Fixed clock for windowed computations
const NOW: i64 = 1_760_000_000_000;

/// Two weeks of readings: a steady previous week around 110 and a current
/// week around 125 with a few fasting highs.
fn seed_two_weeks(db: &Database) {
    let previous = [108.0, 112.0, 110.0, 109.0, 111.0];
    for (i, value) in previous.iter().enumerate() {
        db.insert_reading(&NewReading::new(ReadingType::Random, *value).at(NOW - (8 + i as i64) * DAY))
            .expect("Failed to insert reading");
    }

    let current = [
        (ReadingType::Fasting, 118.0),
        (ReadingType::PostMeal, 135.0),
        (ReadingType::Fasting, 121.0),
        (ReadingType::Random, 124.0),
        (ReadingType::Fasting, 127.0),
    ];
    for (i, (reading_type, value)) in current.iter().enumerate() {
        db.insert_reading(&NewReading::new(*reading_type, *value).at(NOW - i as i64 * DAY - 1000))
            .expect("Failed to insert reading");
    }
}

// =============================================================================
// Store → Statistics
// =============================================================================

#[test]
fn test_stats_over_stored_readings() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    seed_two_weeks(&db);

    let readings = db.list_readings().unwrap();
    assert_eq!(readings.len(), 10);
    assert!(readings.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    let stats = compute_stats(&readings);
    assert_eq!(stats.total, 10);
    assert_eq!(stats.in_range + stats.high_count + stats.low_count, stats.total);
    assert_eq!(stats.highest.as_ref().unwrap().value, 135.0);
    assert_eq!(stats.lowest.as_ref().unwrap().value, 108.0);
    assert_eq!(stats.average, 118);

    let week = compute_windowed_stats(&readings, 7, NOW);
    assert_eq!(week.total, 5);
    assert_eq!(week.average, 125);

    let detailed = detailed_stats(&readings, 7, NOW);
    assert_eq!(detailed.by_type.fasting.len(), 3);
    assert_eq!(detailed.by_type.post_meal.len(), 1);
    assert_eq!(detailed.by_type.random.len(), 1);

    let stale = detailed_stats(&readings, 14, NOW + 60 * DAY);
    assert_eq!(stale.stats.total, 0);
    assert!(stale.by_type.fasting.is_empty());
}

// =============================================================================
// Store → Insights
// =============================================================================

#[test]
fn test_insights_over_stored_readings() {
    let db = Database::in_memory().unwrap();
    seed_two_weeks(&db);
    let readings = db.list_readings().unwrap();

    let weekly = get_weekly_insight(&readings, NOW);
    assert!(weekly.contains("rose this week"), "got: {}", weekly);
    assert!(weekly.contains("125 vs 110"));

    // Newest 118 is exactly 10 below the mean of 135 and 121
    assert_eq!(get_trend(&readings), Trend::Stable);

    let average = compute_stats(&readings).average as f64;
    let message = generate_insight(&readings, readings.first(), average);
    assert!(message.contains("fasting readings are elevated"), "got: {}", message);
}

#[test]
fn test_updates_change_insights() {
    let db = Database::in_memory().unwrap();
    let first = db
        .insert_reading(&NewReading::new(ReadingType::Random, 100.0).at(NOW - DAY))
        .unwrap();
    assert!(generate_insight(&[first.clone()], Some(&first), 100.0).contains("Great start"));

    let latest = db
        .insert_reading(&NewReading::new(ReadingType::Random, 105.0).at(NOW))
        .unwrap();
    db.update_reading(
        &latest.id,
        &ReadingUpdate {
            value: Some(62.0),
            ..Default::default()
        },
    )
    .unwrap()
    .expect("reading exists");

    let readings = db.list_readings().unwrap();
    let message = generate_insight(&readings, readings.first(), 81.0);
    assert!(message.contains("latest reading is low"));

    assert!(db.delete_reading(&latest.id).unwrap());
    assert_eq!(db.list_readings().unwrap().len(), 1);
}

#[test]
fn test_dashboard_matches_engines() {
    let db = Database::in_memory().unwrap();
    seed_two_weeks(&db);
    db.set_user_name("Riley").unwrap();

    let readings = db.list_readings().unwrap();
    let name = db.user_name().unwrap();
    let dashboard = build_dashboard(&readings, name.as_deref(), NOW, 7);

    assert_eq!(dashboard.greeting, "Good morning, Riley! 👋");
    assert_eq!(dashboard.all_time, compute_stats(&readings));
    assert_eq!(dashboard.last_7_days.total, 5);
    assert_eq!(dashboard.insight.kind, InsightKind::ElevatedFasting);
    assert_eq!(dashboard.weekly.current_average, Some(125));
    assert_eq!(dashboard.weekly.previous_average, Some(110));
}

// =============================================================================
// Export and backup
// =============================================================================

#[test]
fn test_backup_restore_prune_workflow() {
    let dir = tempfile::TempDir::new().unwrap();
    let dest = LocalDestination::new(dir.path()).unwrap();

    let db = Database::in_memory().unwrap();
    seed_two_weeks(&db);

    for name in [
        "glyco-2024-01-01-000000.json.gz",
        "glyco-2024-01-02-000000.json.gz",
        "glyco-2024-01-03-000000.json.gz",
    ] {
        db.create_backup(&dest, Some(name)).unwrap();
    }
    assert_eq!(dest.list().unwrap().len(), 3);

    let pruned = dest.prune(&RetentionPolicy::keep_last(1)).unwrap();
    assert_eq!(pruned.deleted_count, 2);
    let remaining = dest.list().unwrap();
    assert_eq!(remaining[0].name, "glyco-2024-01-03-000000.json.gz");

    db.clear_readings().unwrap();
    let result = db.restore_backup(&dest, &remaining[0].name).unwrap();
    assert_eq!(result.restored, 10);
    assert_eq!(db.count_readings().unwrap(), 10);
}

#[test]
fn test_csv_and_json_exports() {
    let db = Database::in_memory().unwrap();
    seed_two_weeks(&db);

    let csv = db.export_csv().unwrap();
    assert_eq!(csv.lines().count(), 11);
    assert!(db.last_export_timestamp().unwrap().is_some());

    let json = db.export_backup_json().unwrap();
    let other = Database::in_memory().unwrap();
    let result = other.import_backup_json(&json).unwrap();
    assert_eq!(result.restored, 10);
    assert_eq!(result.skipped, 0);

    let html = db.export_report().unwrap();
    assert!(html.contains("Total Readings: 10"));
}
