//! Opaque refresh tokens.
//!
//! A refresh token is a 256-bit random value with no embedded claims.
//! Only its SHA-256 hash is persisted; the plaintext exists once, in
//! the response to the client.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Refresh token lifetime: 168 hours.
pub const REFRESH_TTL_HOURS: i64 = 168;

/// Generate a cryptographically random refresh token (32 bytes, hex).
pub fn generate_refresh_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// SHA-256 hash a refresh token for storage.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
