//! Insight Generator
//!
//! Turns readings and their statistics into human-readable commentary:
//! - `rules`: the prioritized single-message insight cascade
//! - `trend`: up/down/stable from the three most recent readings
//! - `weekly`: week-over-week comparison

pub mod rules;
pub mod trend;
pub mod types;
pub mod weekly;

pub use rules::{evaluate_insight, generate_insight, RuleContext, RULES};
pub use trend::get_trend;
pub use types::*;
pub use weekly::{evaluate_weekly_insight, get_weekly_insight};
