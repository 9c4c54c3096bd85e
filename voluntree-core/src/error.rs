//! Error taxonomy shared across the Voluntree crates
//!
//! Authentication and authorization carry their own error types in the web
//! layer; this enum covers the storage and domain failures underneath them.

use thiserror::Error;

pub type VoluntreeResult<T> = Result<T, VoluntreeError>;

/// Main error type for storage and domain operations
#[derive(Error, Debug)]
pub enum VoluntreeError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("Validation error: {0}")]
    Validation(String),

    /// Uniqueness invariant over (user, opportunity) pairs.
    #[error("You have already applied to this opportunity")]
    DuplicateApplication,

    /// At most one host organization per user, enforced at creation time.
    #[error("Organization already exists")]
    OrganizationExists,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Email delivery error: {0}")]
    Email(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VoluntreeError {
    pub fn database<E: std::fmt::Display>(err: E) -> Self {
        Self::Database(err.to_string())
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}
