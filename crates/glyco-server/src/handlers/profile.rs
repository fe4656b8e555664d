//! Profile handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use glyco_core::models::now_millis;
use glyco_core::profile::local_hour;
use glyco_core::Profile;

use crate::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// Display name; blank clears it
    pub name: String,
}

/// GET /api/profile
pub async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<Profile>, AppError> {
    let profile = state
        .db
        .profile(local_hour(now_millis()))
        .map_err(AppError::from_core)?;
    Ok(Json(profile))
}

/// PUT /api/profile - Set the user name
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    if req.name.chars().count() > 100 {
        return Err(AppError::bad_request("Name must be at most 100 characters"));
    }

    state
        .db
        .set_user_name(&req.name)
        .map_err(AppError::from_core)?;

    let profile = state
        .db
        .profile(local_hour(now_millis()))
        .map_err(AppError::from_core)?;
    Ok(Json(profile))
}
