//! Session-cookie authentication
//!
//! The resolver turns an incoming request into an identity or the anonymous
//! state: cookie absent, malformed, tampered or expired all look identical to
//! callers. Extractors follow the Axum `FromRequestParts` pattern.

pub mod cookie;
pub mod handlers;
pub mod session;
pub mod users;

#[cfg(test)]
mod tests;

use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use session::{AuthError, SessionKeys};
use voluntree_core::SessionUser;

/// Resolve a request's session cookie into an identity.
///
/// Side-effect-free and idempotent; may be called multiple times per request.
pub fn resolve_session(jar: &CookieJar, keys: &SessionKeys) -> Option<SessionUser> {
    let token = cookie::retrieve(jar)?;
    keys.decode(token)
}

/// Extractor for handlers that require an authenticated identity.
/// Rejects anonymous requests with 401.
#[derive(Debug)]
pub struct CurrentUser(pub SessionUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        resolve_session(&jar, &app_state.keys)
            .map(CurrentUser)
            .ok_or(AuthError::NotAuthenticated)
    }
}

/// Extractor for handlers where anonymous access is permitted.
/// Never rejects; carries `None` for anonymous requests.
pub struct OptionalUser(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(OptionalUser(resolve_session(&jar, &app_state.keys)))
    }
}
