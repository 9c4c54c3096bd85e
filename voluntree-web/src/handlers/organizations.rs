//! Host organization profile handlers
//!
//! A user administers at most one organization; creation fails if one
//! already exists for the caller.

use super::types::ApiError;
use crate::{
    auth::CurrentUser,
    authz::{Action, AuthzError, ResourceRef},
    database::OrganizationInput,
    AppState,
};
use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tracing::info;
use voluntree_core::VoluntreeError;

/// Fetch the caller's organization profile; `null` if none exists yet
pub async fn get_my_organization(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let organization = state.db.organization_for_user(&user.id).await?;
    Ok(Json(json!({ "organization": organization })))
}

/// Create the caller's organization profile
pub async fn create_organization(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<OrganizationInput>,
) -> Result<Json<Value>, ApiError> {
    state
        .guard
        .authorize(Some(&user), ResourceRef::Organization(None), Action::Create)
        .await?;

    if input.name.trim().is_empty() {
        return Err(VoluntreeError::Validation("organization name is required".to_string()).into());
    }

    let organization = state.db.insert_organization(&user.id, input).await?;

    info!("User {} created organization {}", user.id, organization.id);
    Ok(Json(json!({ "organization": organization })))
}

/// Update the caller's organization profile
pub async fn update_organization(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<OrganizationInput>,
) -> Result<Json<Value>, ApiError> {
    // Surfaces the "create an organization first" signal for callers
    // without one
    state
        .guard
        .authorize(Some(&user), ResourceRef::Organization(None), Action::Update)
        .await?;

    let organization = state
        .db
        .update_organization(&user.id, input)
        .await?
        .ok_or(AuthzError::NotFound("Organization"))?;

    Ok(Json(json!({ "organization": organization })))
}
