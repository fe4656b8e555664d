//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod backup;
pub mod export;
pub mod insights;
pub mod profile;
pub mod readings;
pub mod stats;

// Re-export all handlers for use in router
pub use backup::*;
pub use export::*;
pub use insights::*;
pub use profile::*;
pub use readings::*;
pub use stats::*;
