//! Authentication flows — login/register/refresh/logout delegating to
//! `parento_core::auth`.

use chrono::{DateTime, Utc};
use tracing::info;

use parento_core::auth::password::{hash_password, verify_password};
use parento_core::auth::refresh::{generate_refresh_token, hash_refresh_token};
use parento_core::auth::{AuthError, queries};
use parento_core::models::auth::{TokenClaims, User, UserStatus};

use crate::AppState;
use crate::dto::{AuthUser, LogoutResponse, TokenResponse};
use crate::error::{AppError, AppResult};

/// Build a `TokenResponse` from user data plus a fresh token pair.
fn build_token_response(
    state: &AppState,
    user: &User,
    access_token: String,
    refresh_token: String,
) -> TokenResponse {
    TokenResponse {
        access_token,
        refresh_token,
        expires_in: state.config.access_ttl_secs,
        token_type: "Bearer".to_string(),
        user: AuthUser {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        },
    }
}

/// Issue a fresh access/refresh pair for a user and persist the
/// refresh hash.
async fn issue_token_pair(state: &AppState, user: &User) -> AppResult<TokenResponse> {
    let access_token = state.tokens.issue_access_token(user.id, user.role)?;
    let refresh_token = generate_refresh_token();
    let token_hash = hash_refresh_token(&refresh_token);

    let expires_at = Utc::now() + state.config.refresh_ttl();
    queries::store_refresh_token(&state.pool, &token_hash, user.id, expires_at).await?;

    Ok(build_token_response(state, user, access_token, refresh_token))
}

/// Authenticate with email + password.
///
/// Unknown email, wrong password, and disabled accounts all answer
/// with the same generic error.
pub async fn login(state: &AppState, email: &str, password: &str) -> AppResult<TokenResponse> {
    let row = queries::find_user_by_email(&state.pool, email).await?;

    let Some(found) = row else {
        return Err(AuthError::InvalidCredentials.into());
    };
    let Some(pw_hash) = found.password_hash else {
        return Err(AuthError::InvalidCredentials.into());
    };
    if !verify_password(password, &pw_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }
    if found.user.status == UserStatus::Disabled {
        return Err(AuthError::InvalidCredentials.into());
    }

    issue_token_pair(state, &found.user).await
}

/// Register a new user account with the default `user` role.
pub async fn register(
    state: &AppState,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> AppResult<TokenResponse> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    if queries::email_exists(&state.pool, email).await? {
        return Err(AppError::Validation("Email already registered".into()));
    }

    let pw_hash = hash_password(password, state.config.bcrypt_cost)?;
    // Two concurrent registrations can both pass the existence check;
    // the loser hits the unique index and must not surface a 500.
    let user_id = match queries::create_user(&state.pool, email, name, &pw_hash).await {
        Ok(id) => id,
        Err(AuthError::Db(sqlx::Error::Database(db))) if db.is_unique_violation() => {
            return Err(AppError::Validation("Email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };
    info!(%user_id, "registered new user");

    let user = queries::find_user_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Internal("user vanished after insert".into()))?;

    issue_token_pair(state, &user).await
}

/// Refresh an access token using a refresh token (single-use rotation).
///
/// The role is re-read from the store here, so role changes take effect
/// at the next refresh even though access tokens embed the role.
pub async fn refresh(state: &AppState, refresh_token: &str) -> AppResult<TokenResponse> {
    let token_hash = hash_refresh_token(refresh_token);

    let Some(record) = queries::find_valid_refresh_token(&state.pool, &token_hash).await? else {
        return Err(AppError::Unauthorized("Invalid refresh token".into()));
    };

    // Rotation: the presented token never yields a second pair.
    queries::revoke_refresh_token(&state.pool, record.id).await?;

    let user = queries::find_user_by_id(&state.pool, record.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".into()))?;
    if user.status == UserStatus::Disabled {
        return Err(AppError::Unauthorized("Invalid refresh token".into()));
    }

    issue_token_pair(state, &user).await
}

/// Logout — revoke the presented access token (by `jti`) and refresh
/// token. Both are best-effort: an already-invalid token changes
/// nothing.
pub async fn logout(
    state: &AppState,
    access_token: Option<&str>,
    refresh_token: Option<&str>,
) -> AppResult<LogoutResponse> {
    if let Some(token) = access_token {
        // Ignore failures: an unparsable token has nothing to revoke.
        let _ = state.tokens.revoke(token);
    }
    if let Some(token) = refresh_token {
        let token_hash = hash_refresh_token(token);
        queries::revoke_refresh_token_by_hash(&state.pool, &token_hash).await?;
    }
    Ok(LogoutResponse { success: true })
}

/// Logout everywhere — revoke every refresh token the user holds plus
/// the access token making the call. Other outstanding access tokens
/// run out at their natural expiry.
pub async fn logout_all(state: &AppState, claims: &TokenClaims) -> AppResult<LogoutResponse> {
    queries::revoke_all_refresh_tokens(&state.pool, claims.sub).await?;
    if let Some(expires_at) = DateTime::from_timestamp(claims.exp, 0) {
        state.tokens.revocations().revoke(claims.jti, expires_at);
    }
    info!(user_id = %claims.sub, "all sessions revoked");
    Ok(LogoutResponse { success: true })
}
