//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glyco_core::{DateRange, ReadingType};

/// Glyco - Track blood glucose and spot patterns
#[derive(Parser)]
#[command(name = "glyco")]
#[command(about = "Self-hosted blood glucose tracker with insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "glyco.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for real health data)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set GLYCO_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Log a glucose reading
    Add {
        /// Glucose value in mg/dL (1-600)
        value: f64,

        /// Reading type: fasting, post-meal, random
        #[arg(short = 't', long = "type", default_value = "random")]
        reading_type: ReadingType,

        /// When the reading was taken, local time "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// Free-text notes (max 200 characters)
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List readings, newest first
    List {
        /// Only show one reading type
        #[arg(short = 't', long = "type")]
        reading_type: Option<ReadingType>,

        /// Date range: all, today, week, month
        #[arg(short, long, default_value = "all")]
        range: DateRange,

        /// Maximum number of readings to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show a single reading
    Show {
        /// Reading ID
        id: String,
    },

    /// Edit a reading
    Edit {
        /// Reading ID
        id: String,

        /// New glucose value in mg/dL
        #[arg(long)]
        value: Option<f64>,

        /// New reading type
        #[arg(short = 't', long = "type")]
        reading_type: Option<ReadingType>,

        /// New local time "YYYY-MM-DD HH:MM"
        #[arg(long)]
        at: Option<String>,

        /// New notes (empty string clears them)
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete a reading
    Delete {
        /// Reading ID
        id: String,
    },

    /// Show statistics (all time, or the last N days)
    Stats {
        /// Only include readings from the last N days, broken down by type
        #[arg(short, long)]
        days: Option<u32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the current insight message
    Insight,

    /// Show the short-term trend of the latest readings
    Trend,

    /// Compare this week with last week
    Weekly,

    /// Show dashboard summary
    Dashboard {
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Export readings (CSV, HTML report, or JSON backup document)
    Export {
        #[command(subcommand)]
        format: ExportFormat,
    },

    /// Import a JSON backup document, skipping readings that already exist
    Import {
        /// JSON backup file
        file: PathBuf,
    },

    /// Manage backups (create, list, restore, prune)
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Show or update the profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Show database status (encryption, size, etc.)
    Status,

    /// Delete all readings and settings
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires a bearer key from GLYCO_API_KEYS.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ExportFormat {
    /// Spreadsheet-friendly CSV
    Csv {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Printable HTML report for a healthcare provider
    Report {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// JSON backup document
    Json {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum BackupAction {
    /// Create a new backup
    Create {
        /// Backup name (defaults to timestamped name)
        #[arg(short, long)]
        name: Option<String>,

        /// Backup directory (defaults to ~/.local/share/glyco/backups)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// List available backups
    List {
        /// Backup directory (defaults to ~/.local/share/glyco/backups)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Merge a backup into the database
    Restore {
        /// Backup name to restore from
        name: String,

        /// Backup directory (defaults to ~/.local/share/glyco/backups)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Delete old backups according to retention policy
    Prune {
        /// Number of backups to keep (default: 7)
        #[arg(long, default_value = "7")]
        keep: usize,

        /// Backup directory (defaults to ~/.local/share/glyco/backups)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show name, greeting, and last export time
    Show,

    /// Set the name used in greetings (empty clears it)
    SetName {
        /// Display name
        name: String,
    },
}
