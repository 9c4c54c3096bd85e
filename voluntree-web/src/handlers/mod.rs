//! HTTP request handlers for the Voluntree web server
//!
//! Handlers are thin: resolve the session, ask the authorization guard, then
//! perform the storage call and translate errors at this boundary.

pub mod applications;
pub mod health;
pub mod opportunities;
pub mod organizations;
pub mod profile;
pub mod types;

pub use applications::*;
pub use health::*;
pub use opportunities::*;
pub use organizations::*;
pub use profile::*;
pub use types::*;
