//! Application handlers: applying, reviewing, status changes
//!
//! One application per (user, opportunity) pair. Notification emails are
//! fire-and-forget and never fail the request.

use super::types::ApiError;
use crate::{
    auth::CurrentUser,
    authz::{Action, AuthzError, ResourceRef},
    email::{application_received_email, application_status_email},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use voluntree_core::ApplicationStatus;

/// Free-form application form data, stored as a JSON document
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub applicant_type: Option<String>,
    pub availability_start: Option<String>,
    pub availability_end: Option<String>,
    pub duration_weeks: Option<i64>,
    pub motivation: Option<String>,
    pub relevant_experience: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewApplication {
    pub opportunity_id: String,
    #[serde(flatten)]
    pub form: ApplicationForm,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Submit an application to an opportunity
pub async fn create_application(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<NewApplication>,
) -> Result<Json<Value>, ApiError> {
    state
        .guard
        .authorize(Some(&user), ResourceRef::Application(None), Action::Create)
        .await?;

    let listing = state
        .db
        .opportunity(&request.opportunity_id)
        .await?
        .ok_or(AuthzError::NotFound("Opportunity"))?;

    let details = serde_json::to_value(&request.form)
        .unwrap_or(Value::Null);
    let application = state
        .db
        .insert_application(&user.id, &request.opportunity_id, &details)
        .await?;

    info!(
        "User {} applied to opportunity {}",
        user.id, request.opportunity_id
    );

    let applicant_name = request
        .form
        .full_name
        .clone()
        .or_else(|| user.full_name.clone())
        .unwrap_or_else(|| "Volunteer".to_string());
    let (subject, html) = application_received_email(
        &applicant_name,
        &listing.opportunity.title,
        &listing.host_name,
    );
    state.mailer.send_in_background(user.email.clone(), subject, html);

    Ok(Json(json!({ "application": application })))
}

/// List the caller's own applications
pub async fn list_my_applications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let applications = state.db.applications_for_user(&user.id).await?;
    Ok(Json(json!({ "applications": applications })))
}

/// Fetch one application with review context. Readable by the applicant and
/// by the organization owning the target opportunity.
pub async fn get_application(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .guard
        .authorize(
            Some(&user),
            ResourceRef::Application(Some(id.clone())),
            Action::Read,
        )
        .await?;

    let application = state
        .db
        .application_detail(&id)
        .await?
        .ok_or(AuthzError::NotFound("Application"))?;

    Ok(Json(json!({ "application": application })))
}

/// Update an application's review status (owning organization only)
pub async fn update_application_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<StatusUpdate>,
) -> Result<Json<Value>, ApiError> {
    let status: ApplicationStatus = request.status.parse()?;

    state
        .guard
        .authorize(
            Some(&user),
            ResourceRef::Application(Some(id.clone())),
            Action::Update,
        )
        .await?;

    let application = state
        .db
        .update_application_status(&id, status)
        .await?
        .ok_or(AuthzError::NotFound("Application"))?;

    info!("Application {} set to {} by {}", id, status, user.id);

    // Notify the applicant of the decision
    if let Some(detail) = state.db.application_detail(&id).await? {
        let applicant_name = detail
            .applicant_name
            .clone()
            .unwrap_or_else(|| "Volunteer".to_string());
        let (subject, html) =
            application_status_email(&applicant_name, &detail.opportunity_title, status);
        state
            .mailer
            .send_in_background(detail.applicant_email, subject, html);
    }

    Ok(Json(json!({ "application": application })))
}
