//! Dashboard insight cascade
//!
//! Rules are evaluated in order and the first one that produces a message
//! wins. Readings frequently satisfy several rules at once (a low latest
//! reading alongside an excellent average, say), so the order of `RULES`
//! decides what the user sees.

use tracing::debug;

use crate::models::{Reading, ReadingType, MS_PER_HOUR};
use crate::stats::mean;

use super::types::{Insight, InsightKind};

/// Latest reading below this warns about a low
const LATEST_LOW: f64 = 70.0;
/// Latest reading above this warns about a high
const LATEST_HIGH: f64 = 180.0;
/// Latest reading from here up to `LATEST_HIGH` is mildly elevated
const LATEST_ELEVATED: f64 = 140.0;

/// Readings considered by the variability check
const VARIABILITY_WINDOW: usize = 7;
const VARIABILITY_RANGE: f64 = 100.0;

/// Recent readings of one type needed for a pattern check
const PATTERN_SAMPLE: usize = 3;

const STREAK_LEN: usize = 7;
const CONSISTENCY_LEN: usize = 5;
const CONSISTENCY_MAX_GAP_MS: u64 = 24 * MS_PER_HOUR as u64;

/// Inputs shared by every rule
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Readings sorted newest first
    pub readings: &'a [Reading],
    pub latest: Option<&'a Reading>,
    pub average: f64,
}

impl<'a> RuleContext<'a> {
    /// Up to `n` most recent readings of one type
    fn recent_of_type(&self, reading_type: ReadingType, n: usize) -> Vec<&'a Reading> {
        self.readings
            .iter()
            .filter(|r| r.reading_type == reading_type)
            .take(n)
            .collect()
    }
}

/// One entry of the cascade
pub struct Rule {
    pub kind: InsightKind,
    check: fn(&RuleContext<'_>) -> Option<String>,
}

impl Rule {
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<String> {
        (self.check)(ctx)
    }
}

/// Priority-ordered rules, highest first
pub static RULES: &[Rule] = &[
    Rule {
        kind: InsightKind::Onboarding,
        check: onboarding,
    },
    Rule {
        kind: InsightKind::NeedMoreData,
        check: need_more_data,
    },
    Rule {
        kind: InsightKind::LatestLow,
        check: latest_low,
    },
    Rule {
        kind: InsightKind::LatestHigh,
        check: latest_high,
    },
    Rule {
        kind: InsightKind::LatestElevated,
        check: latest_elevated,
    },
    Rule {
        kind: InsightKind::AverageLow,
        check: average_low,
    },
    Rule {
        kind: InsightKind::AverageHigh,
        check: average_high,
    },
    Rule {
        kind: InsightKind::ExcellentControl,
        check: excellent_control,
    },
    Rule {
        kind: InsightKind::GreatControl,
        check: great_control,
    },
    Rule {
        kind: InsightKind::HighVariability,
        check: high_variability,
    },
    Rule {
        kind: InsightKind::ElevatedFasting,
        check: elevated_fasting,
    },
    Rule {
        kind: InsightKind::FastingOnTarget,
        check: fasting_on_target,
    },
    Rule {
        kind: InsightKind::PostMealHigh,
        check: post_meal_high,
    },
    Rule {
        kind: InsightKind::InRangeStreak,
        check: in_range_streak,
    },
    Rule {
        kind: InsightKind::ConsistentTracking,
        check: consistent_tracking,
    },
    Rule {
        kind: InsightKind::KeepTracking,
        check: keep_tracking,
    },
];

fn onboarding(ctx: &RuleContext<'_>) -> Option<String> {
    ctx.readings.is_empty().then(|| {
        "Start tracking your glucose levels to get personalized insights! 📊".to_string()
    })
}

fn need_more_data(ctx: &RuleContext<'_>) -> Option<String> {
    (ctx.readings.len() == 1)
        .then(|| "Great start! Add more readings to see trends and patterns. 🎯".to_string())
}

fn latest_low(ctx: &RuleContext<'_>) -> Option<String> {
    let latest = ctx.latest?;
    (latest.value < LATEST_LOW).then(|| {
        "⚠️ Your latest reading is low. Consider having a snack and retest in 15 minutes."
            .to_string()
    })
}

fn latest_high(ctx: &RuleContext<'_>) -> Option<String> {
    let latest = ctx.latest?;
    (latest.value > LATEST_HIGH).then(|| {
        "⚠️ Your latest reading is high. Stay hydrated and monitor closely.".to_string()
    })
}

fn latest_elevated(ctx: &RuleContext<'_>) -> Option<String> {
    let latest = ctx.latest?;
    (latest.value >= LATEST_ELEVATED && latest.value <= LATEST_HIGH).then(|| {
        "📈 Your latest reading is slightly elevated. Consider reviewing your recent meals."
            .to_string()
    })
}

fn average_low(ctx: &RuleContext<'_>) -> Option<String> {
    (ctx.average < 80.0).then(|| {
        "💡 Your average is on the lower side. Discuss with your doctor about adjusting your management plan."
            .to_string()
    })
}

fn average_high(ctx: &RuleContext<'_>) -> Option<String> {
    (ctx.average > 130.0).then(|| {
        "💡 Your average is higher than target. Consider reviewing your diet and medication with your doctor."
            .to_string()
    })
}

fn excellent_control(ctx: &RuleContext<'_>) -> Option<String> {
    (ctx.average >= 100.0 && ctx.average <= 110.0).then(|| {
        "✨ Excellent! Your glucose levels are well-controlled. Keep up the great work!"
            .to_string()
    })
}

fn great_control(ctx: &RuleContext<'_>) -> Option<String> {
    (ctx.average >= 80.0 && ctx.average < 100.0)
        .then(|| "👍 Great control! Your average is in the optimal range.".to_string())
}

fn high_variability(ctx: &RuleContext<'_>) -> Option<String> {
    let recent = ctx.readings.iter().take(VARIABILITY_WINDOW).map(|r| r.value);
    let (min, max) = recent.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    });
    (max - min > VARIABILITY_RANGE).then(|| {
        "📊 Your readings show high variability. Try to maintain consistent meal and activity patterns."
            .to_string()
    })
}

/// Mean of the most recent `PATTERN_SAMPLE` readings of a type, if there are that many
fn pattern_mean(ctx: &RuleContext<'_>, reading_type: ReadingType) -> Option<f64> {
    let recent = ctx.recent_of_type(reading_type, PATTERN_SAMPLE);
    if recent.len() < PATTERN_SAMPLE {
        return None;
    }
    mean(recent)
}

fn elevated_fasting(ctx: &RuleContext<'_>) -> Option<String> {
    let avg = pattern_mean(ctx, ReadingType::Fasting)?;
    (avg > 110.0).then(|| {
        "🌅 Your fasting readings are elevated. Consider discussing with your healthcare provider."
            .to_string()
    })
}

fn fasting_on_target(ctx: &RuleContext<'_>) -> Option<String> {
    let avg = pattern_mean(ctx, ReadingType::Fasting)?;
    (avg >= 70.0 && avg <= 100.0).then(|| {
        "🌅 Your fasting glucose levels look great! Keep maintaining your routine.".to_string()
    })
}

fn post_meal_high(ctx: &RuleContext<'_>) -> Option<String> {
    let avg = pattern_mean(ctx, ReadingType::PostMeal)?;
    (avg > 140.0).then(|| {
        "🍽️ Post-meal readings are high. Consider portion control or reviewing your meal choices."
            .to_string()
    })
}

fn in_range_streak(ctx: &RuleContext<'_>) -> Option<String> {
    if ctx.readings.len() < STREAK_LEN {
        return None;
    }
    let all_in_range = ctx
        .readings
        .iter()
        .take(STREAK_LEN)
        .all(|r| r.value >= 70.0 && r.value <= 140.0);
    all_in_range.then(|| {
        "🎉 Amazing! All your recent readings are in the target range. You're doing fantastic!"
            .to_string()
    })
}

fn consistent_tracking(ctx: &RuleContext<'_>) -> Option<String> {
    if ctx.readings.len() < CONSISTENCY_LEN {
        return None;
    }
    let consistent = ctx.readings[..CONSISTENCY_LEN]
        .windows(2)
        .all(|pair| pair[0].timestamp.abs_diff(pair[1].timestamp) <= CONSISTENCY_MAX_GAP_MS);
    consistent.then(|| {
        "⏰ Great consistency! Regular monitoring helps you understand your patterns better."
            .to_string()
    })
}

fn keep_tracking(_ctx: &RuleContext<'_>) -> Option<String> {
    Some("📈 Keep tracking consistently to get better insights into your glucose patterns!".to_string())
}

/// Run the cascade and return the first matching insight
pub fn evaluate_insight(readings: &[Reading], latest: Option<&Reading>, average: f64) -> Insight {
    let ctx = RuleContext {
        readings,
        latest,
        average,
    };

    for rule in RULES {
        if let Some(message) = rule.evaluate(&ctx) {
            debug!(rule = rule.kind.as_str(), "Insight rule matched");
            return Insight::new(rule.kind, message);
        }
    }

    // keep_tracking always matches
    Insight::new(
        InsightKind::KeepTracking,
        keep_tracking(&ctx).unwrap_or_default(),
    )
}

/// Message of the first matching insight rule
pub fn generate_insight(readings: &[Reading], latest: Option<&Reading>, average: f64) -> String {
    evaluate_insight(readings, latest, average).message
}
