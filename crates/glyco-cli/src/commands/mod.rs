//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `backup` - Backup management commands (create, list, restore, prune)
//! - `core` - Init and shared utilities (open_db)
//! - `export` - CSV/report/JSON export and JSON import
//! - `insights` - Stats, insight, trend, and weekly commands
//! - `profile` - Profile commands (show, set-name)
//! - `readings` - Reading commands (add, list, show, edit, delete)
//! - `serve` - Web server command
//! - `status` - Status/dashboard/reset commands

pub mod backup;
pub mod core;
pub mod export;
pub mod insights;
pub mod profile;
pub mod readings;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use backup::*;
pub use core::*;
pub use export::*;
pub use insights::*;
pub use profile::*;
pub use readings::*;
pub use serve::*;
pub use status::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
