//! Authentication request handlers.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{Extension, Json, extract::State};

use parento_core::models::auth::Principal;

use crate::AppState;
use crate::dto::{
    LoginRequest, LogoutRequest, LogoutResponse, MeResponse, RefreshRequest, RegisterRequest,
    TokenResponse,
};
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::auth;

/// `POST /auth/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(&state, &body.email, &body.password).await?;
    Ok(Json(resp))
}

/// `POST /auth/register` — create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::register(&state, &body.email, &body.password, body.name.as_deref()).await?;
    Ok(Json(resp))
}

/// `POST /auth/refresh` — exchange a refresh token for a new pair.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::refresh(&state, &body.refresh_token).await?;
    Ok(Json(resp))
}

/// `POST /auth/logout` — revoke the presented access and refresh
/// tokens. Public: an expired access token must still be able to end
/// its session.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LogoutRequest>,
) -> AppResult<Json<LogoutResponse>> {
    let access_token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let resp = auth::logout(&state, access_token, body.refresh_token.as_deref()).await?;
    Ok(Json(resp))
}

/// `POST /auth/logout-all` — revoke every session of the calling
/// user: all live refresh tokens plus the access token presented here.
pub async fn logout_all_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<LogoutResponse>> {
    let resp = auth::logout_all(&state, &claims).await?;
    Ok(Json(resp))
}

/// `GET /auth/me` — the principal from the validated claims. No store
/// lookup; this is the claims' view of the user.
pub async fn me_handler(
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> Json<MeResponse> {
    let principal = Principal::from(&claims);
    Json(MeResponse {
        id: principal.user_id,
        role: principal.role,
    })
}
