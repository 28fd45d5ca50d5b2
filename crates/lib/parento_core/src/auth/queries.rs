//! Credential-store and refresh-token queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::{RefreshTokenRecord, Role, User, UserStatus, UserWithPassword};
use crate::ids::uuidv7;

fn parse_role(raw: &str) -> Result<Role, AuthError> {
    raw.parse().map_err(AuthError::Internal)
}

fn parse_status(raw: &str) -> Result<UserStatus, AuthError> {
    raw.parse().map_err(AuthError::Internal)
}

/// Fetch a user (with password hash) by email.
pub async fn find_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserWithPassword>, AuthError> {
    let row = sqlx::query_as::<_, (Uuid, Option<String>, Option<String>, String, String)>(
        "SELECT id, name, password_hash, role::text, status::text FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(|(id, name, password_hash, role, status)| {
        Ok(UserWithPassword {
            user: User {
                id,
                email: email.to_string(),
                name,
                role: parse_role(&role)?,
                status: parse_status(&status)?,
            },
            password_hash,
        })
    })
    .transpose()
}

/// Fetch a user by ID.
pub async fn find_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, (String, Option<String>, String, String)>(
        "SELECT email, name, role::text, status::text FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(|(email, name, role, status)| {
        Ok(User {
            id: user_id,
            email,
            name,
            role: parse_role(&role)?,
            status: parse_status(&status)?,
        })
    })
    .transpose()
}

/// Create a new user with the default `user` role, returning the ID.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    name: Option<&str>,
    password_hash: &str,
) -> Result<Uuid, AuthError> {
    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    Ok(user_id)
}

/// Check whether an email is already registered.
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AuthError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Store a refresh token hash.
pub async fn store_refresh_token(
    pool: &PgPool,
    token_hash: &str,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<(), AuthError> {
    sqlx::query(
        "INSERT INTO refresh_tokens (id, token_hash, user_id, expires_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(uuidv7())
    .bind(token_hash)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Find a valid, non-revoked, non-expired refresh token by hash.
pub async fn find_valid_refresh_token(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<RefreshTokenRecord>, AuthError> {
    let row = sqlx::query_as::<_, (Uuid, Uuid, DateTime<Utc>)>(
        "SELECT rt.id, rt.user_id, rt.expires_at \
         FROM refresh_tokens rt \
         WHERE rt.token_hash = $1 \
           AND rt.revoked_at IS NULL \
           AND rt.expires_at > now()",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id, user_id, expires_at)| RefreshTokenRecord {
        id,
        user_id,
        expires_at,
    }))
}

/// Revoke a refresh token by ID.
pub async fn revoke_refresh_token(pool: &PgPool, token_id: Uuid) -> Result<(), AuthError> {
    sqlx::query("UPDATE refresh_tokens SET revoked_at = now() WHERE id = $1")
        .bind(token_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Revoke a refresh token by hash.
pub async fn revoke_refresh_token_by_hash(
    pool: &PgPool,
    token_hash: &str,
) -> Result<(), AuthError> {
    sqlx::query(
        "UPDATE refresh_tokens SET revoked_at = now() \
         WHERE token_hash = $1 AND revoked_at IS NULL",
    )
    .bind(token_hash)
    .execute(pool)
    .await?;
    Ok(())
}

/// Revoke all refresh tokens for a user.
pub async fn revoke_all_refresh_tokens(pool: &PgPool, user_id: Uuid) -> Result<(), AuthError> {
    sqlx::query(
        "UPDATE refresh_tokens SET revoked_at = now() \
         WHERE user_id = $1 AND revoked_at IS NULL",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}
