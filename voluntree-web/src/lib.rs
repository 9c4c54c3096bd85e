//! Voluntree Web Server
//!
//! Server-rendered marketplace API: organizations post opportunities,
//! individuals browse and apply, organizations review applications.

pub mod auth;
pub mod authz;
pub mod database;
pub mod email;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::VoluntreeServer;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE, COOKIE},
        HeaderValue, Method,
    },
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // Credentials (the session cookie) must be allowed for the frontend origin
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_credentials(true)
        .allow_headers([ACCEPT, CONTENT_TYPE, COOKIE]);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable development mode
    pub dev_mode: bool,
    /// Database URL
    pub database_url: String,
    /// Symmetric secret for session token signing, loaded once at startup
    pub session_secret: String,
    /// Mark the session cookie `Secure` (production transport)
    pub secure_cookies: bool,
    /// API key for the transactional email provider (emails disabled if unset)
    pub email_api_key: Option<String>,
    /// Sender address for transactional email
    pub email_from: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            dev_mode: false,
            database_url: "sqlite::memory:".to_string(),
            session_secret: "voluntree-default-secret-change-in-production".to_string(),
            secure_cookies: false,
            email_api_key: None,
            email_from: "Voluntree <onboarding@resend.dev>".to_string(),
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("VOLUNTREE_HOST").unwrap_or(defaults.host),
            port: std::env::var("VOLUNTREE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            dev_mode: std::env::var("VOLUNTREE_DEV_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            session_secret: std::env::var("SESSION_SECRET").unwrap_or(defaults.session_secret),
            secure_cookies: std::env::var("VOLUNTREE_SECURE_COOKIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            email_api_key: std::env::var("RESEND_API_KEY").ok(),
            email_from: std::env::var("EMAIL_FROM").unwrap_or(defaults.email_from),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<voluntree_core::VoluntreeError> for WebError {
    fn from(err: voluntree_core::VoluntreeError) -> Self {
        WebError::Database(err.to_string())
    }
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voluntree_web=debug,tower_http=debug,axum=debug".into()),
        )
        .init();
}
