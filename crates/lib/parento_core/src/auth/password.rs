//! Password hashing.
//!
//! bcrypt with a caller-supplied work factor; the server reads the
//! factor from configuration so deployments can raise it without a
//! code change.

use super::AuthError;

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Hash a plaintext password at the given work factor.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(plain, cost).map_err(|e| AuthError::Internal(format!("password hash: {e}")))
}

/// Check a plaintext password against a stored bcrypt hash. The hash
/// records its own cost, so verification works across cost changes.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(plain, hash).map_err(|e| AuthError::Internal(format!("password verify: {e}")))
}
