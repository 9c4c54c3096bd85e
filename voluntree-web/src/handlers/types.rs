//! Shared handler types and the boundary error translation

use crate::authz::AuthzError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;
use voluntree_core::VoluntreeError;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Boundary error for CRUD handlers. Authorization failures keep their own
/// response mapping; domain errors are translated here.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Core(#[from] VoluntreeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Authz(err) => err.into_response(),
            ApiError::Core(err) => {
                let (status, error_code) = match &err {
                    VoluntreeError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                    VoluntreeError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                    VoluntreeError::DuplicateApplication => {
                        (StatusCode::CONFLICT, "duplicate_application")
                    }
                    VoluntreeError::OrganizationExists => {
                        (StatusCode::CONFLICT, "organization_exists")
                    }
                    VoluntreeError::EmailTaken => (StatusCode::BAD_REQUEST, "email_taken"),
                    VoluntreeError::Database(_)
                    | VoluntreeError::Email(_)
                    | VoluntreeError::Config(_) => {
                        error!("Internal error at API boundary: {}", err);
                        (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                    }
                };

                let message = match status {
                    // Never echo internal detail to clients
                    StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
                    _ => err.to_string(),
                };

                (status, Json(json!({ "error": error_code, "message": message })))
                    .into_response()
            }
        }
    }
}
