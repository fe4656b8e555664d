//! Test utilities for glyco-core
//!
//! Reading builders pinned to a fixed clock so windowed computations are
//! deterministic.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{Reading, ReadingType, MS_PER_HOUR};

/// Fixed "now" for tests (2025-10-09T08:53:20Z)
pub const REFERENCE_TIME: i64 = 1_760_000_000_000;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> String {
    format!("test-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// A reading of any type at a given time
pub fn typed_reading_at(reading_type: ReadingType, value: f64, timestamp: i64) -> Reading {
    Reading {
        id: next_id(),
        reading_type,
        value,
        timestamp,
        notes: None,
    }
}

/// A random reading at a given time
pub fn reading_at(value: f64, timestamp: i64) -> Reading {
    typed_reading_at(ReadingType::Random, value, timestamp)
}

/// A random reading taken at `REFERENCE_TIME`
pub fn reading(value: f64) -> Reading {
    reading_at(value, REFERENCE_TIME)
}

pub fn reading_with_id(id: &str, value: f64) -> Reading {
    Reading {
        id: id.to_string(),
        ..reading(value)
    }
}

/// Random readings sorted newest first, one hour apart, ending at `REFERENCE_TIME`
pub fn series(values: &[f64]) -> Vec<Reading> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| reading_at(*v, REFERENCE_TIME - i as i64 * MS_PER_HOUR))
        .collect()
}
