//! Export and JSON import handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Response, StatusCode},
    Json,
};
use tracing::info;

use glyco_core::RestoreResult;

use crate::{AppError, AppState};

/// Build a download response with the given content type and file name
fn attachment(content_type: &str, file_name: &str, body: String) -> Result<Response<Body>, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(body))
        .map_err(|e| AppError::internal(&e.to_string()))
}

fn dated_name(stem: &str, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        stem,
        chrono::Local::now().format("%Y-%m-%d"),
        extension
    )
}

/// GET /api/export/csv - Download readings as CSV
pub async fn export_csv(State(state): State<Arc<AppState>>) -> Result<Response<Body>, AppError> {
    let csv = state.db.export_csv().map_err(AppError::from_core)?;
    attachment(
        "text/csv; charset=utf-8",
        &dated_name("glyco-readings", "csv"),
        csv,
    )
}

/// GET /api/export/report - Printable HTML report
pub async fn export_report(
    State(state): State<Arc<AppState>>,
) -> Result<Response<Body>, AppError> {
    let html = state.db.export_report().map_err(AppError::from_core)?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(html))
        .map_err(|e| AppError::internal(&e.to_string()))
}

/// GET /api/export/json - Download a JSON backup document
pub async fn export_json(State(state): State<Arc<AppState>>) -> Result<Response<Body>, AppError> {
    let json = state
        .db
        .export_backup_json()
        .map_err(AppError::from_core)?;
    attachment(
        "application/json",
        &dated_name("glyco-backup", "json"),
        json,
    )
}

/// POST /api/import/json - Merge a JSON backup document, skipping known ids
pub async fn import_json(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<RestoreResult>, AppError> {
    let result = state
        .db
        .import_backup_json(&body)
        .map_err(AppError::from_core)?;

    info!(
        restored = result.restored,
        skipped = result.skipped,
        "Imported JSON backup via API"
    );

    Ok(Json(result))
}
