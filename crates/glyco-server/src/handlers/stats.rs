//! Statistics handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use glyco_core::models::now_millis;
use glyco_core::{compute_stats, compute_windowed_stats, detailed_stats, DetailedStats, StatsSnapshot};

use crate::{AppError, AppState};

/// Default window for detailed stats
const DEFAULT_DETAILED_DAYS: u32 = 14;

/// Longest supported window (ten years)
const MAX_DAYS: u32 = 3650;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub days: Option<u32>,
}

fn check_days(days: u32) -> Result<u32, AppError> {
    if days == 0 || days > MAX_DAYS {
        return Err(AppError::bad_request(&format!(
            "days must be between 1 and {}",
            MAX_DAYS
        )));
    }
    Ok(days)
}

/// GET /api/stats?days= - All-time stats, or the last N days
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StatsSnapshot>, AppError> {
    let readings = state.db.list_readings().map_err(AppError::from_core)?;

    let stats = match params.days {
        None => compute_stats(&readings),
        Some(days) => compute_windowed_stats(&readings, check_days(days)?, now_millis()),
    };

    Ok(Json(stats))
}

/// GET /api/stats/detailed?days= - Windowed stats split by reading type (default 14 days)
pub async fn get_detailed_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<DetailedStats>, AppError> {
    let days = check_days(params.days.unwrap_or(DEFAULT_DETAILED_DAYS))?;
    let readings = state.db.list_readings().map_err(AppError::from_core)?;

    Ok(Json(detailed_stats(&readings, days, now_millis())))
}
