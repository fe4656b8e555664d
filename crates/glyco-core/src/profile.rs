//! Time-of-day greetings

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::Result;
use crate::models::to_local;

/// Greeting for an hour of the day (0-23)
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

/// Greeting with the user's name when one is set
pub fn personalized_greeting(hour: u32, name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{}, {}! 👋", greeting(hour), name),
        None => format!("{}! 👋", greeting(hour)),
    }
}

/// Local hour of a millisecond timestamp
pub fn local_hour(timestamp: i64) -> u32 {
    to_local(timestamp).map(|dt| dt.hour()).unwrap_or(0)
}

/// User profile as shown to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub greeting: String,
    pub last_export_timestamp: Option<i64>,
}

impl Database {
    /// Load the profile, greeting for the given hour
    pub fn profile(&self, hour: u32) -> Result<Profile> {
        let name = self.user_name()?;
        Ok(Profile {
            greeting: personalized_greeting(hour, name.as_deref()),
            name,
            last_export_timestamp: self.last_export_timestamp()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting(0), "Good morning");
        assert_eq!(greeting(11), "Good morning");
        assert_eq!(greeting(12), "Good afternoon");
        assert_eq!(greeting(17), "Good afternoon");
        assert_eq!(greeting(18), "Good evening");
        assert_eq!(greeting(23), "Good evening");
    }

    #[test]
    fn test_personalized_greeting() {
        assert_eq!(personalized_greeting(9, Some("Sam")), "Good morning, Sam! 👋");
        assert_eq!(personalized_greeting(20, None), "Good evening! 👋");
        assert_eq!(personalized_greeting(13, Some("   ")), "Good afternoon! 👋");
    }

    #[test]
    fn test_profile_from_settings() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.profile(8).unwrap().greeting, "Good morning! 👋");

        db.set_user_name("  Alex ").unwrap();
        let profile = db.profile(19).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Alex"));
        assert_eq!(profile.greeting, "Good evening, Alex! 👋");
        assert!(profile.last_export_timestamp.is_none());

        db.set_user_name("").unwrap();
        assert!(db.profile(19).unwrap().name.is_none());
    }
}
