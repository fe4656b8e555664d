//! Insight, trend, and dashboard handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use glyco_core::models::now_millis;
use glyco_core::profile::local_hour;
use glyco_core::{
    build_dashboard, compute_stats, evaluate_insight, evaluate_weekly_insight, get_trend,
    Dashboard, Insight, Trend, WeeklyInsight,
};

use crate::{AppError, AppState};

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub trend: Trend,
    pub emoji: &'static str,
}

impl From<Trend> for TrendResponse {
    fn from(trend: Trend) -> Self {
        Self {
            trend,
            emoji: trend.emoji(),
        }
    }
}

/// Everything the insights card shows
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insight: Insight,
    pub trend: TrendResponse,
    pub weekly: WeeklyInsight,
}

/// GET /api/insights - Current insight, trend, and weekly comparison
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InsightsResponse>, AppError> {
    let readings = state.db.list_readings().map_err(AppError::from_core)?;
    let average = compute_stats(&readings).average as f64;

    Ok(Json(InsightsResponse {
        insight: evaluate_insight(&readings, readings.first(), average),
        trend: get_trend(&readings).into(),
        weekly: evaluate_weekly_insight(&readings, now_millis()),
    }))
}

/// GET /api/insights/weekly
pub async fn get_weekly(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WeeklyInsight>, AppError> {
    let readings = state.db.list_readings().map_err(AppError::from_core)?;
    Ok(Json(evaluate_weekly_insight(&readings, now_millis())))
}

/// GET /api/trend
pub async fn get_trend_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TrendResponse>, AppError> {
    let readings = state.db.list_readings().map_err(AppError::from_core)?;
    Ok(Json(get_trend(&readings).into()))
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, AppError> {
    let readings = state.db.list_readings().map_err(AppError::from_core)?;
    let name = state.db.user_name().map_err(AppError::from_core)?;
    let now = now_millis();

    Ok(Json(build_dashboard(
        &readings,
        name.as_deref(),
        now,
        local_hour(now),
    )))
}
