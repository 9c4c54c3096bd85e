//! Opportunity browse and management handlers
//!
//! Browsing is public; posting, editing and deleting are scoped to the
//! owning organization through the authorization guard.

use super::types::ApiError;
use crate::{
    auth::{CurrentUser, OptionalUser},
    authz::{Action, AuthzError, ResourceRef},
    database::OpportunityInput,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ListOpportunitiesParams {
    /// Restrict the listing to the caller's own organization
    #[serde(default)]
    pub host_only: bool,
}

/// List opportunities: the public active listing, or the caller's own
/// postings with `?host_only=true`.
pub async fn list_opportunities(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(params): Query<ListOpportunitiesParams>,
) -> Result<Json<Value>, ApiError> {
    if params.host_only {
        let user = user.ok_or(AuthzError::Unauthenticated)?;

        // No organization yet is an empty dashboard, not an error
        let Some(org_id) = state.db.organization_id_for_user(&user.id).await? else {
            return Ok(Json(json!({ "opportunities": [] })));
        };

        let opportunities = state.db.list_opportunities_for_organization(&org_id).await?;
        return Ok(Json(json!({ "opportunities": opportunities })));
    }

    let opportunities = state.db.list_active_opportunities().await?;
    Ok(Json(json!({ "opportunities": opportunities })))
}

/// Fetch a single opportunity with its host summary (public)
pub async fn get_opportunity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let opportunity = state
        .db
        .opportunity(&id)
        .await?
        .ok_or(AuthzError::NotFound("Opportunity"))?;

    Ok(Json(json!({ "opportunity": opportunity })))
}

/// Create an opportunity under the caller's organization
pub async fn create_opportunity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<OpportunityInput>,
) -> Result<Json<Value>, ApiError> {
    let grant = state
        .guard
        .authorize(Some(&user), ResourceRef::Opportunity(None), Action::Create)
        .await?;
    let org_id = grant.organization_id().ok_or(AuthzError::NoOrganization)?;

    let opportunity = state.db.insert_opportunity(org_id, input).await?;

    info!("User {} posted opportunity {}", user.id, opportunity.id);
    Ok(Json(json!({ "opportunity": opportunity })))
}

/// Update an opportunity (owning organization only)
pub async fn update_opportunity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<OpportunityInput>,
) -> Result<Json<Value>, ApiError> {
    let grant = state
        .guard
        .authorize(
            Some(&user),
            ResourceRef::Opportunity(Some(id.clone())),
            Action::Update,
        )
        .await?;
    let org_id = grant.organization_id().ok_or(AuthzError::NoOrganization)?;

    let opportunity = state
        .db
        .update_opportunity(&id, org_id, input)
        .await?
        .ok_or(AuthzError::NotFound("Opportunity"))?;

    Ok(Json(json!({ "opportunity": opportunity })))
}

/// Delete an opportunity (owning organization only)
pub async fn delete_opportunity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let grant = state
        .guard
        .authorize(
            Some(&user),
            ResourceRef::Opportunity(Some(id.clone())),
            Action::Delete,
        )
        .await?;
    let org_id = grant.organization_id().ok_or(AuthzError::NoOrganization)?;

    if !state.db.delete_opportunity(&id, org_id).await? {
        return Err(AuthzError::NotFound("Opportunity").into());
    }

    info!("User {} deleted opportunity {}", user.id, id);
    Ok(Json(json!({ "success": true })))
}
