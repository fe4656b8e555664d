//! Backup API handlers

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use glyco_core::backup::{
    default_backup_dir, validate_backup_name, BackupDestination, BackupInfo, LocalDestination,
    PruneResult, RetentionPolicy,
};
use glyco_core::RestoreResult;

use crate::{AppError, AppState, SuccessResponse};

/// Create backup request
#[derive(Debug, Default, Deserialize)]
pub struct CreateBackupRequest {
    /// Optional backup name (defaults to timestamped name)
    pub name: Option<String>,
}

/// Create backup response
#[derive(Debug, Serialize)]
pub struct CreateBackupResponse {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub readings: usize,
    pub compressed: bool,
}

/// Prune request
#[derive(Debug, Deserialize)]
pub struct PruneBackupsRequest {
    /// Number of backups to keep (default: 7)
    pub keep: Option<usize>,
}

fn get_backup_dir(state: &AppState) -> PathBuf {
    state.backup_dir.clone().unwrap_or_else(default_backup_dir)
}

fn open_destination(state: &AppState) -> Result<LocalDestination, AppError> {
    LocalDestination::new(get_backup_dir(state))
        .map_err(|e| AppError::internal(&format!("Failed to access backup directory: {}", e)))
}

/// GET /api/backup - List available backups, newest first
pub async fn list_backups(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BackupInfo>>, AppError> {
    if !get_backup_dir(&state).exists() {
        return Ok(Json(vec![]));
    }

    let backups = open_destination(&state)?
        .list()
        .map_err(AppError::from_core)?;

    Ok(Json(backups))
}

/// POST /api/backup - Create a backup
pub async fn create_backup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBackupRequest>,
) -> Result<Json<CreateBackupResponse>, AppError> {
    if let Some(ref name) = req.name {
        validate_backup_name(name).map_err(AppError::from_core)?;
    }

    let destination = open_destination(&state)?;
    let result = state
        .db
        .create_backup(&destination, req.name.as_deref())
        .map_err(AppError::from_core)?;

    info!(name = %result.info.name, "Backup created via API");

    Ok(Json(CreateBackupResponse {
        name: result.info.name,
        path: result.info.path,
        size: result.info.size,
        readings: result.readings,
        compressed: result.info.compressed,
    }))
}

/// POST /api/backup/:name/restore - Merge a backup into the store
pub async fn restore_backup(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<RestoreResult>, AppError> {
    validate_backup_name(&name).map_err(AppError::from_core)?;

    let destination = open_destination(&state)?;
    let result = state
        .db
        .restore_backup(&destination, &name)
        .map_err(AppError::from_core)?;

    Ok(Json(result))
}

/// DELETE /api/backup/:name
pub async fn delete_backup(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    validate_backup_name(&name).map_err(AppError::from_core)?;

    open_destination(&state)?
        .delete(&name)
        .map_err(AppError::from_core)?;

    info!(name = %name, "Backup deleted via API");
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/backup/prune - Keep only the most recent backups
pub async fn prune_backups(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PruneBackupsRequest>,
) -> Result<Json<PruneResult>, AppError> {
    let policy = req
        .keep
        .map(RetentionPolicy::keep_last)
        .unwrap_or_default();

    let result = open_destination(&state)?
        .prune(&policy)
        .map_err(AppError::from_core)?;

    Ok(Json(result))
}
