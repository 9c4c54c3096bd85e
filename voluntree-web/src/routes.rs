//! Route definitions for the Voluntree web server

use crate::{auth, handlers, AppState};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/auth/signup", post(auth::handlers::signup))
        .route("/auth/login", post(auth::handlers::login))
        .route("/auth/logout", post(auth::handlers::logout))
        .route("/auth/me", get(auth::handlers::me))
        // Volunteer profile
        .route("/profile", get(handlers::get_profile))
        .route("/profile", put(handlers::update_profile))
        // Host organization
        .route("/host-organization", get(handlers::get_my_organization))
        .route("/host-organization", post(handlers::create_organization))
        .route("/host-organization", put(handlers::update_organization))
        // Opportunities
        .route("/opportunities", get(handlers::list_opportunities))
        .route("/opportunities", post(handlers::create_opportunity))
        .route("/opportunities/{id}", get(handlers::get_opportunity))
        .route("/opportunities/{id}", put(handlers::update_opportunity))
        .route("/opportunities/{id}", delete(handlers::delete_opportunity))
        // Applications
        .route("/applications", get(handlers::list_my_applications))
        .route("/applications", post(handlers::create_application))
        .route("/applications/{id}", get(handlers::get_application))
        .route(
            "/applications/{id}",
            patch(handlers::update_application_status),
        )
}
