//! JWT authentication for the tasks service.
//!
//! This crate provides token generation and validation. The server wraps its
//! routes with a guard built from a [`JwtManager`].

mod error;
mod jwt;

pub use error::*;
pub use jwt::*;

/// Default JWT expiration time in hours.
pub const DEFAULT_JWT_EXPIRATION_HOURS: u64 = 24;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "tasks";
