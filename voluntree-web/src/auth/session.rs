//! Signed session tokens
//!
//! Stateless JWT verification: no server-side session table, no revocation
//! list. Expiry is the only invalidation mechanism short of secret rotation,
//! which invalidates every outstanding session at once.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};
use voluntree_core::SessionUser;

/// Fixed session lifetime: 7 days
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session token signing and verification keys.
///
/// Built once from the configured secret at startup and shared read-only by
/// all request handlers via `AppState`.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Sign an identity claim set into an opaque session token.
    /// Issued-at is now; expiry is now + 7 days.
    pub fn encode(&self, user: &SessionUser) -> Result<String, AuthError> {
        let claims = Claims::new(user);
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            warn!("Failed to encode session token: {}", e);
            AuthError::TokenCreation
        })
    }

    /// Verify a session token and recover the identity claim set.
    ///
    /// Malformed, tampered and expired tokens all collapse to `None` so the
    /// caller cannot distinguish an almost-valid token from a missing one.
    pub fn decode(&self, token: &str) -> Option<SessionUser> {
        let data = match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => data,
            Err(e) => {
                debug!("Session token verification failed: {}", e);
                return None;
            }
        };

        if data.claims.is_expired() {
            debug!("Session token expired");
            return None;
        }

        Some(data.claims.into_user())
    }
}

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Display name captured at login
    pub name: Option<String>,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(user: &SessionUser) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(SESSION_TTL_SECONDS);

        Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.full_name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn into_user(self) -> SessionUser {
        SessionUser {
            id: self.sub,
            email: self.email,
            full_name: self.name,
        }
    }
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing credentials")]
    MissingCredentials,
    #[error("Email is already registered")]
    EmailTaken,
    #[error("Token creation failed")]
    TokenCreation,
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Storage error")]
    Storage,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password",
            ),
            AuthError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                "missing_credentials",
                "Email and password are required",
            ),
            AuthError::EmailTaken => (
                StatusCode::BAD_REQUEST,
                "email_taken",
                "A user with this email already exists",
            ),
            AuthError::TokenCreation => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_creation_failed",
                "Failed to create session token",
            ),
            AuthError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "not_authenticated",
                "Not authenticated",
            ),
            AuthError::Storage => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Internal storage error",
            ),
        };

        let body = Json(json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> SessionUser {
        SessionUser {
            id: "user-1".to_string(),
            email: "a@x.com".to_string(),
            full_name: Some("Ada".to_string()),
        }
    }

    #[test]
    fn encode_decode_round_trips_the_claim_set() {
        let keys = SessionKeys::new(b"test-secret");
        let token = keys.encode(&test_user()).unwrap();

        let user = keys.decode(&token).expect("token should verify");
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.full_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn display_name_is_optional() {
        let keys = SessionKeys::new(b"test-secret");
        let user = SessionUser {
            full_name: None,
            ..test_user()
        };
        let token = keys.encode(&user).unwrap();
        assert_eq!(keys.decode(&token).unwrap().full_name, None);
    }

    #[test]
    fn token_signed_with_different_secret_is_invalid() {
        let keys = SessionKeys::new(b"secret-one");
        let other = SessionKeys::new(b"secret-two");
        let token = keys.encode(&test_user()).unwrap();

        assert!(other.decode(&token).is_none());
    }

    #[test]
    fn tampered_token_is_invalid() {
        let keys = SessionKeys::new(b"test-secret");
        let token = keys.encode(&test_user()).unwrap();
        let tampered = format!("{}x", token);

        assert!(keys.decode(&tampered).is_none());
        assert!(keys.decode("not-a-token").is_none());
    }

    #[test]
    fn storage_failures_render_as_internal_errors() {
        use axum::response::IntoResponse;

        // Credential-storage and hashing failures must not masquerade as
        // token or credential problems
        let response = AuthError::Storage.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn expired_token_is_invalid_even_with_correct_signature() {
        let keys = SessionKeys::new(b"test-secret");

        // Manually construct claims with expiry well in the past (beyond any
        // validation leeway) and sign them with the correct secret.
        let now = Utc::now();
        let claims = Claims {
            sub: "user-1".to_string(),
            email: "a@x.com".to_string(),
            name: None,
            iat: (now - Duration::days(8)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();

        assert!(keys.decode(&token).is_none());
    }
}
