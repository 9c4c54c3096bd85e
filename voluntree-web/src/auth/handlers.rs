//! Authentication handlers: signup, login, logout, current user
//!
//! Each successful authentication issues a fresh session cookie; the old
//! token is superseded, never mutated. Logout deletes the cookie.

use super::{
    cookie,
    session::AuthError,
    users::{AuthResponse, LoginRequest, SignupRequest},
    CurrentUser,
};
use crate::AppState;
use axum::{extract::State, response::Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};
use tracing::info;

/// User signup endpoint
///
/// Creates the user and profile rows, then issues a session cookie.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<SignupRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AuthError> {
    info!("Signup attempt: {}", request.email);

    let user = state.users.signup(request).await?;
    let token = state.keys.encode(&user)?;
    let jar = cookie::store(jar, token, state.config.secure_cookies);

    info!("User signed up successfully: {}", user.id);
    Ok((jar, Json(AuthResponse { user })))
}

/// User login endpoint
///
/// Verifies credentials and issues a fresh session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AuthError> {
    info!("Login attempt: {}", request.email);

    let user = state.users.login(request).await?;
    let token = state.keys.encode(&user)?;
    let jar = cookie::store(jar, token, state.config.secure_cookies);

    info!("User logged in successfully: {}", user.id);
    Ok((jar, Json(AuthResponse { user })))
}

/// Logout endpoint
///
/// Stateless tokens cannot be revoked server-side; deleting the cookie is the
/// whole logout.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = cookie::clear(jar);
    (jar, Json(json!({ "message": "Logged out successfully" })))
}

/// Current user endpoint ("who am I")
///
/// Resolves the session and joins the profile display name fresh from
/// storage.
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<Value>, AuthError> {
    let user = state.users.current(&identity).await?;
    Ok(Json(json!({ "user": user })))
}
