//! Volunteer profile handlers

use super::types::ApiError;
use crate::{auth::CurrentUser, database::ProfileUpdate, AppState};
use axum::{extract::State, response::Json};
use serde_json::{json, Value};

/// Create or update the caller's profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Value>, ApiError> {
    state.db.upsert_profile(&user.id, update).await?;
    Ok(Json(json!({ "success": true })))
}

/// Fetch the caller's profile; `null` if never filled in
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let profile = state.db.profile_for_user(&user.id).await?;
    Ok(Json(json!({ "profile": profile })))
}
