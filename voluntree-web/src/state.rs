//! Application state shared across all request handlers

use crate::{
    auth::{session::SessionKeys, users::UserService},
    authz::AuthorizationGuard,
    database::Database,
    email::Mailer,
    WebConfig, WebResult,
};
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: WebConfig,
    /// Database handle
    pub db: Arc<Database>,
    /// Session token signing keys, derived once from the configured secret
    pub keys: Arc<SessionKeys>,
    /// Request authorization guard
    pub guard: AuthorizationGuard,
    /// Account and credential service
    pub users: UserService,
    /// Transactional email sender
    pub mailer: Arc<Mailer>,
}

impl AppState {
    /// Connect the database and wire up the services
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let db = Arc::new(Database::connect(&config.database_url).await?);
        let keys = Arc::new(SessionKeys::new(config.session_secret.as_bytes()));
        let guard = AuthorizationGuard::new(db.clone());
        let users = UserService::new(db.clone());
        let mailer = Arc::new(Mailer::new(
            config.email_api_key.clone(),
            config.email_from.clone(),
        ));

        if config.email_api_key.is_none() {
            info!("No email API key configured, notification emails disabled");
        }

        Ok(Self {
            config,
            db,
            keys,
            guard,
            users,
            mailer,
        })
    }
}
