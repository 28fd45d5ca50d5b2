//! JWT access-token issuance and verification.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use uuid::Uuid;

use super::AuthError;
use super::revocation::RevocationList;
use crate::models::auth::{Role, TokenClaims};

/// Access token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;

/// Default `iss` claim.
pub const DEFAULT_ISSUER: &str = "parento";

/// Default `aud` claim.
pub const DEFAULT_AUDIENCE: &str = "parento-api";

/// Token service configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Symmetric HS256 signing secret. Must be non-empty; rotating it
    /// invalidates all outstanding access tokens at once.
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
        }
    }
}

/// Issues, validates, and revokes bearer credentials.
///
/// Issuance and validation are pure over the immutable keys and safe
/// for unrestricted concurrent use; the revocation list is the only
/// shared mutable state and synchronizes internally.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    revocations: Arc<RevocationList>,
}

impl TokenService {
    /// Build the service. Fails on an empty signing secret; callers
    /// treat that as fatal at startup, never per-request.
    pub fn new(config: TokenConfig, revocations: Arc<RevocationList>) -> Result<Self, AuthError> {
        if config.secret.is_empty() {
            return Err(AuthError::KeyConfig("signing secret is empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Zero leeway: a token one second past `exp` is expired.
        validation.leeway = 0;
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            audience: config.audience,
            access_ttl: config.access_ttl,
            revocations,
        })
    }

    /// Issue a signed access token for a user. The role is embedded in
    /// the claims (see `TokenClaims::role` for the trade-off).
    pub fn issue_access_token(&self, user_id: Uuid, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id,
            role,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify signature, issuer, audience, and expiry. Does not consult
    /// the revocation list.
    pub fn validate_access_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })
    }

    /// [`Self::validate_access_token`] plus a revocation-list lookup on
    /// the token's `jti`.
    pub fn validate_with_revocation(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.validate_access_token(token)?;
        if self.revocations.is_revoked(&claims.jti) {
            return Err(AuthError::TokenRevoked);
        }
        Ok(claims)
    }

    /// Revoke a token by inserting its `jti` into the revocation list
    /// until its natural expiry. Expiry is not validated here: revoking
    /// an already-expired token is a harmless no-op.
    pub fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let mut validation = self.validation.clone();
        validation.validate_exp = false;
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::TokenInvalid)?;

        let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0)
            .ok_or(AuthError::TokenInvalid)?;
        self.revocations.revoke(claims.jti, expires_at);
        Ok(())
    }

    /// Sweep expired revocation entries. Safe to call from a periodic
    /// task or lazily inline.
    pub fn cleanup(&self) {
        self.revocations.cleanup();
    }

    /// Handle to the shared revocation list.
    pub fn revocations(&self) -> &Arc<RevocationList> {
        &self.revocations
    }
}
