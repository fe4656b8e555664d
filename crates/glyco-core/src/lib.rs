//! Glyco Core Library
//!
//! Shared functionality for the Glyco glucose tracker:
//! - Reading store with encrypted SQLite storage and migrations
//! - Statistics engine (average, extremes, range partition, windows)
//! - Insight generator (rule cascade, trend, weekly comparison)
//! - CSV, HTML report and JSON backup export
//! - Backup system with pluggable destinations

pub mod backup;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;
pub mod profile;
pub mod report;
pub mod stats;

/// Reading builders pinned to a fixed clock
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use backup::{
    BackupDestination, BackupInfo, BackupResult, LocalDestination, PruneResult, RetentionPolicy,
};
pub use dashboard::{build_dashboard, Dashboard, LatestReading};
pub use db::Database;
pub use error::{Error, Result};
pub use export::{BackupData, RestoreResult};
pub use insights::{
    evaluate_insight, evaluate_weekly_insight, generate_insight, get_trend, get_weekly_insight,
    Insight, InsightKind, Severity, Trend, WeeklyInsight, WeeklyKind,
};
pub use models::{
    DateRange, GlucoseStatus, NewReading, Reading, ReadingFilter, ReadingType, ReadingUpdate,
};
pub use profile::Profile;
pub use stats::{
    compute_stats, compute_windowed_stats, detailed_stats, DetailedStats, ReadingsByType,
    StatsSnapshot,
};
