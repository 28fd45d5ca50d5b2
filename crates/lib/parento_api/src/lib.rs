//! # parento_api
//!
//! HTTP API library for Parento.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use parento_core::auth::jwt::TokenService;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{auth, bookings, slots};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
    /// Token service, sharing one revocation list process-wide.
    pub tokens: Arc<TokenService>,
}

/// Run embedded database migrations.
///
/// Delegates to `parento_core::migrate::migrate()` which owns the
/// migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    parento_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/refresh", post(auth::refresh_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (require a valid, unrevoked access token)
    let protected = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/auth/logout-all", post(auth::logout_all_handler))
        .route("/slots", get(slots::list_slots_handler))
        .route("/slots", post(slots::create_slot_handler))
        .route("/bookings", get(bookings::list_bookings_handler))
        .route("/bookings", post(bookings::create_booking_handler))
        .route("/bookings/{id}", delete(bookings::cancel_booking_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
