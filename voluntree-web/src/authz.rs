//! Ownership-based authorization
//!
//! Every decision is one walk of the ownership chain: resolve the identity's
//! owned organization, then compare it with the organization owning the
//! target resource (directly for opportunities, through the parent
//! opportunity for applications). The walk lives here once instead of being
//! repeated in every route handler.

use crate::database::Database;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use voluntree_core::{SessionUser, VoluntreeError};

/// The resource an action targets. `None` ids mean "a new resource of this
/// kind" and are only meaningful with `Action::Create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Organization(Option<String>),
    Opportunity(Option<String>),
    Application(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// A positive decision, carrying the scope the action was granted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Public-read action, no identity required
    Public,
    /// Action scoped to the actor's own records
    SelfScoped { user_id: String },
    /// Action scoped to the organization the actor administers
    OrganizationOwner { organization_id: String },
}

impl Grant {
    /// The organization id this grant was issued for, if organization-scoped.
    pub fn organization_id(&self) -> Option<&str> {
        match self {
            Grant::OrganizationOwner { organization_id } => Some(organization_id),
            _ => None,
        }
    }
}

/// Authorization failures, each mapping to a distinct transport signal.
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// No identity; the remedy is signing in.
    #[error("Not authenticated")]
    Unauthenticated,
    /// Identity resolved but the prerequisite organization profile does not
    /// exist yet; the remedy is creating one, not an access-control failure.
    #[error("No organization found. Please create an organization profile first.")]
    NoOrganization,
    /// Identity resolved but does not own the target resource.
    #[error("You do not have access to this resource")]
    Denied,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Storage error during authorization")]
    Storage(#[source] VoluntreeError),
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            AuthzError::Unauthenticated => (StatusCode::UNAUTHORIZED, "not_authenticated"),
            AuthzError::NoOrganization => (StatusCode::BAD_REQUEST, "no_organization"),
            AuthzError::Denied => (StatusCode::FORBIDDEN, "forbidden"),
            AuthzError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AuthzError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        };

        let message = self.to_string();
        (status, Json(json!({ "error": error_code, "message": message }))).into_response()
    }
}

/// Decides whether a resolved identity may act on a resource.
///
/// Pure function of its inputs plus storage: re-checking the same
/// (identity, resource, action) without an intervening mutation always
/// yields the same decision.
#[derive(Clone)]
pub struct AuthorizationGuard {
    db: Arc<Database>,
}

impl AuthorizationGuard {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn authorize(
        &self,
        identity: Option<&SessionUser>,
        resource: ResourceRef,
        action: Action,
    ) -> Result<Grant, AuthzError> {
        // Browsing opportunities is the only public surface
        if let (ResourceRef::Opportunity(_), Action::Read) = (&resource, action) {
            return Ok(Grant::Public);
        }

        let user = identity.ok_or(AuthzError::Unauthenticated)?;

        match resource {
            ResourceRef::Organization(target) => self.authorize_organization(user, target, action).await,
            ResourceRef::Opportunity(target) => self.authorize_opportunity(user, target, action).await,
            ResourceRef::Application(target) => self.authorize_application(user, target, action).await,
        }
    }

    async fn authorize_organization(
        &self,
        user: &SessionUser,
        target: Option<String>,
        action: Action,
    ) -> Result<Grant, AuthzError> {
        match action {
            // Any authenticated user may create their (first) organization;
            // the one-per-user rule is a storage conflict, not authorization.
            Action::Create => Ok(Grant::SelfScoped {
                user_id: user.id.clone(),
            }),
            Action::Read | Action::Update | Action::Delete => {
                let owned = self.owned_organization(user).await?;
                match target {
                    // No explicit target: the caller's own organization
                    None => Ok(Grant::OrganizationOwner {
                        organization_id: owned,
                    }),
                    Some(id) if id == owned => Ok(Grant::OrganizationOwner {
                        organization_id: owned,
                    }),
                    Some(id) => {
                        warn!(
                            "User {} denied {:?} on organization {}",
                            user.id, action, id
                        );
                        Err(AuthzError::Denied)
                    }
                }
            }
        }
    }

    async fn authorize_opportunity(
        &self,
        user: &SessionUser,
        target: Option<String>,
        action: Action,
    ) -> Result<Grant, AuthzError> {
        // Reads were already granted as public in `authorize`; every action
        // that reaches here is organization-scoped. The prerequisite check
        // comes before any resource lookup, so organization-less users
        // always see the "create an organization first" signal.
        let owned = self.owned_organization(user).await?;

        match action {
            Action::Read | Action::Create => Ok(Grant::OrganizationOwner {
                organization_id: owned,
            }),
            Action::Update | Action::Delete => {
                let id = target.ok_or(AuthzError::NotFound("Opportunity"))?;
                let owner = self
                    .db
                    .organization_id_for_opportunity(&id)
                    .await
                    .map_err(AuthzError::Storage)?
                    .ok_or(AuthzError::NotFound("Opportunity"))?;

                if owner == owned {
                    Ok(Grant::OrganizationOwner {
                        organization_id: owned,
                    })
                } else {
                    warn!(
                        "User {} (org {}) denied {:?} on opportunity {} owned by org {}",
                        user.id, owned, action, id, owner
                    );
                    Err(AuthzError::Denied)
                }
            }
        }
    }

    async fn authorize_application(
        &self,
        user: &SessionUser,
        target: Option<String>,
        action: Action,
    ) -> Result<Grant, AuthzError> {
        match action {
            // Applying is self-scoped; duplicate submissions are a storage
            // conflict, not an authorization decision.
            Action::Create => Ok(Grant::SelfScoped {
                user_id: user.id.clone(),
            }),
            Action::Read => {
                let id = target.ok_or(AuthzError::NotFound("Application"))?;
                let (applicant_id, owner_org) = self
                    .db
                    .application_refs(&id)
                    .await
                    .map_err(AuthzError::Storage)?
                    .ok_or(AuthzError::NotFound("Application"))?;

                // The applicant retains read access to their own application
                if applicant_id == user.id {
                    return Ok(Grant::SelfScoped {
                        user_id: user.id.clone(),
                    });
                }

                let owned = self.owned_organization(user).await?;
                if owned == owner_org {
                    Ok(Grant::OrganizationOwner {
                        organization_id: owned,
                    })
                } else {
                    debug!(
                        "User {} denied read on application {} of org {}",
                        user.id, id, owner_org
                    );
                    Err(AuthzError::Denied)
                }
            }
            Action::Update | Action::Delete => {
                // Review actions are organization-scoped only
                let owned = self.owned_organization(user).await?;
                let id = target.ok_or(AuthzError::NotFound("Application"))?;
                let (_, owner_org) = self
                    .db
                    .application_refs(&id)
                    .await
                    .map_err(AuthzError::Storage)?
                    .ok_or(AuthzError::NotFound("Application"))?;

                if owned == owner_org {
                    Ok(Grant::OrganizationOwner {
                        organization_id: owned,
                    })
                } else {
                    warn!(
                        "User {} (org {}) denied {:?} on application {} of org {}",
                        user.id, owned, action, id, owner_org
                    );
                    Err(AuthzError::Denied)
                }
            }
        }
    }

    /// First hop of the ownership chain. Absence is the `PrerequisiteMissing`
    /// signal, distinct from a plain denial.
    async fn owned_organization(&self, user: &SessionUser) -> Result<String, AuthzError> {
        self.db
            .organization_id_for_user(&user.id)
            .await
            .map_err(AuthzError::Storage)?
            .ok_or(AuthzError::NoOrganization)
    }
}
