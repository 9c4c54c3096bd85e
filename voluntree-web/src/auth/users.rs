//! User accounts: signup, login, password hashing
//!
//! The canonical design is one `users` row (credentials) plus one `profiles`
//! row (display data) per account, created together at signup.

use super::session::AuthError;
use crate::database::Database;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use voluntree_core::{SessionUser, VoluntreeError};

/// Signup request
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Signup/login response body. The session token itself travels only in the
/// Set-Cookie header, never in the body.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: SessionUser,
}

/// User account service backed by the shared database
#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a new user and profile, returning the identity to issue a
    /// session for.
    pub async fn signup(&self, request: SignupRequest) -> Result<SessionUser, AuthError> {
        if request.email.is_empty() || request.password.is_empty() {
            debug!("Signup failed: missing credentials");
            return Err(AuthError::MissingCredentials);
        }

        if request.password.len() < 6 {
            debug!("Signup failed: password too short");
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = hash_password(&request.password)?;

        let user = match self.db.insert_user(&request.email, &password_hash).await {
            Ok(user) => user,
            Err(VoluntreeError::EmailTaken) => {
                debug!("Signup failed: email '{}' already exists", request.email);
                return Err(AuthError::EmailTaken);
            }
            Err(e) => {
                error!("Failed to insert user: {}", e);
                return Err(AuthError::Storage);
            }
        };

        if let Err(e) = self
            .db
            .upsert_profile_name(&user.id, request.full_name.as_deref())
            .await
        {
            // The account exists; a missing profile row is recoverable later
            warn!("Failed to create profile for user {}: {}", user.id, e);
        }

        info!("Registered new user: {}", user.id);

        Ok(SessionUser {
            id: user.id,
            email: user.email,
            full_name: request.full_name,
        })
    }

    /// Verify credentials and return the identity to issue a session for.
    pub async fn login(&self, request: LoginRequest) -> Result<SessionUser, AuthError> {
        let user = self
            .db
            .user_by_email(&request.email)
            .await
            .map_err(|e| {
                error!("Failed to look up user: {}", e);
                AuthError::Storage
            })?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash) {
            warn!("Invalid password for user: {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let full_name = self
            .db
            .profile_for_user(&user.id)
            .await
            .map_err(|e| {
                error!("Failed to load profile: {}", e);
                AuthError::Storage
            })?
            .and_then(|p| p.full_name);

        debug!("User authenticated: {}", user.id);

        Ok(SessionUser {
            id: user.id,
            email: user.email,
            full_name,
        })
    }

    /// Look up the current account data for "who am I" responses.
    /// The profile row is the source of truth for the display name.
    pub async fn current(&self, identity: &SessionUser) -> Result<SessionUser, AuthError> {
        let full_name = self
            .db
            .profile_for_user(&identity.id)
            .await
            .map_err(|e| {
                error!("Failed to load profile: {}", e);
                AuthError::Storage
            })?
            .and_then(|p| p.full_name);

        Ok(SessionUser {
            id: identity.id.clone(),
            email: identity.email.clone(),
            full_name,
        })
    }
}

/// Hash password using Argon2
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            AuthError::Storage
        })
}

/// Verify password against hash
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("hunter22", "not-a-phc-string"));
    }
}
