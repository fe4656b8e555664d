//! Short-term trend from the three most recent readings

use crate::models::Reading;

use super::types::Trend;

/// Change from the prior readings' mean needed to call a direction
const TREND_DELTA: f64 = 10.0;

/// Compare the newest reading against the mean of the two before it.
///
/// `readings` must be sorted newest first. Fewer than three readings is
/// always `Stable`.
pub fn get_trend(readings: &[Reading]) -> Trend {
    let [newest, second, third, ..] = readings else {
        return Trend::Stable;
    };

    let prior = (second.value + third.value) / 2.0;
    if newest.value > prior + TREND_DELTA {
        Trend::Up
    } else if newest.value < prior - TREND_DELTA {
        Trend::Down
    } else {
        Trend::Stable
    }
}
