//! Authentication and authorization primitives.
//!
//! Provides the token service (JWT issue/validate/revoke), the shared
//! revocation list, opaque refresh tokens, password hashing, and the
//! credential-store queries shared across the API crates.

pub mod jwt;
pub mod password;
pub mod queries;
pub mod refresh;
pub mod revocation;

use thiserror::Error;

/// Authentication errors.
///
/// The token variants are deliberately message-free: the HTTP layer
/// must answer a revoked token exactly like an invalid one.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Signing key misconfigured: {0}")]
    KeyConfig(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
