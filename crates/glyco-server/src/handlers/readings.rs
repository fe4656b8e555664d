//! Reading CRUD handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use glyco_core::models::now_millis;
use glyco_core::{DateRange, NewReading, Reading, ReadingFilter, ReadingType, ReadingUpdate};

use crate::{AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};

/// History list filters
#[derive(Debug, Deserialize)]
pub struct ListReadingsQuery {
    /// fasting, post-meal, random (omitted = all)
    #[serde(rename = "type")]
    pub reading_type: Option<String>,
    /// all, today, week, month (default: all)
    pub range: Option<String>,
    pub limit: Option<usize>,
}

/// New reading payload; timestamp defaults to now
#[derive(Debug, Deserialize)]
pub struct CreateReadingRequest {
    #[serde(rename = "type")]
    pub reading_type: ReadingType,
    pub value: f64,
    pub timestamp: Option<i64>,
    pub notes: Option<String>,
}

/// GET /api/readings - List readings, newest first
pub async fn list_readings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListReadingsQuery>,
) -> Result<Json<Vec<Reading>>, AppError> {
    let reading_type = params
        .reading_type
        .as_deref()
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"))
        .map(str::parse::<ReadingType>)
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;
    let range = params
        .range
        .as_deref()
        .map(str::parse::<DateRange>)
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?
        .unwrap_or_default();
    let limit = params.limit.unwrap_or(MAX_PAGE_LIMIT).min(MAX_PAGE_LIMIT);

    let filter = ReadingFilter {
        reading_type,
        range,
    };
    let mut readings = state
        .db
        .list_readings_filtered(&filter, now_millis())
        .map_err(AppError::from_core)?;
    readings.truncate(limit);

    Ok(Json(readings))
}

/// POST /api/readings - Log a reading
pub async fn create_reading(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateReadingRequest>,
) -> Result<(StatusCode, Json<Reading>), AppError> {
    let mut new = NewReading::new(req.reading_type, req.value);
    if let Some(timestamp) = req.timestamp {
        new = new.at(timestamp);
    }
    if let Some(notes) = req.notes {
        new = new.with_notes(notes);
    }

    let reading = state.db.insert_reading(&new).map_err(AppError::from_core)?;
    info!(id = %reading.id, "Reading created via API");

    Ok((StatusCode::CREATED, Json(reading)))
}

/// GET /api/readings/:id
pub async fn get_reading(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Reading>, AppError> {
    let reading = state
        .db
        .get_reading(&id)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found("Reading not found"))?;

    Ok(Json(reading))
}

/// PATCH /api/readings/:id - Partial update
pub async fn update_reading(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<ReadingUpdate>,
) -> Result<Json<Reading>, AppError> {
    if update.is_empty() {
        return Err(AppError::bad_request("No fields to update"));
    }

    let reading = state
        .db
        .update_reading(&id, &update)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found("Reading not found"))?;

    Ok(Json(reading))
}

/// DELETE /api/readings/:id
pub async fn delete_reading(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_reading(&id).map_err(AppError::from_core)? {
        return Err(AppError::not_found("Reading not found"));
    }

    Ok(Json(SuccessResponse { success: true }))
}
