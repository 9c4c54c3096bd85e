//! Voluntree Core - shared domain types and error taxonomy
//!
//! This crate defines the entities of the marketplace (users, profiles, host
//! organizations, opportunities, applications) and the error types shared by
//! the storage and web layers.

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
