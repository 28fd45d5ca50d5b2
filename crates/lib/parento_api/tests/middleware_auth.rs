//! Middleware tests — build the real router and drive it with
//! `tower::ServiceExt::oneshot`. `/auth/me` answers from claims alone,
//! so a lazy (never-connected) pool is enough.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use parento_api::{AppState, config::ApiConfig};
use parento_core::auth::jwt::{TokenConfig, TokenService};
use parento_core::auth::revocation::RevocationList;
use parento_core::models::auth::Role;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test-secret";

fn test_state() -> AppState {
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        pg_connection_url: "postgres://localhost:5432/parento_test".into(),
        jwt_secret: SECRET.into(),
        access_ttl_secs: 900,
        refresh_ttl_hours: 168,
        bcrypt_cost: 4,
    };
    let tokens = TokenService::new(config.token_config(), Arc::new(RevocationList::new()))
        .expect("token service");
    AppState {
        pool: sqlx::PgPool::connect_lazy(&config.pg_connection_url).expect("lazy pool"),
        config,
        tokens: Arc::new(tokens),
    }
}

fn me_request(auth_header: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/auth/me");
    if let Some(value) = auth_header {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("parse JSON")
}

#[tokio::test]
async fn missing_header_is_401() {
    let app = parento_api::router(test_state());
    let resp = app.oneshot(me_request(None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let app = parento_api::router(test_state());
    let resp = app
        .oneshot(me_request(Some("Basic dXNlcjpwdw==")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn lowercase_bearer_prefix_is_rejected() {
    let app = parento_api::router(test_state());
    let resp = app
        .oneshot(me_request(Some("bearer whatever")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_401() {
    let app = parento_api::router(test_state());
    let resp = app
        .oneshot(me_request(Some("Bearer not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn valid_token_reaches_the_handler() {
    let state = test_state();
    let user_id = Uuid::new_v4();
    let token = state
        .tokens
        .issue_access_token(user_id, Role::Advisor)
        .unwrap();

    let app = parento_api::router(state);
    let resp = app
        .oneshot(me_request(Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["id"], user_id.to_string());
    assert_eq!(json["role"], "advisor");
}

#[tokio::test]
async fn expired_token_is_401() {
    let state = test_state();
    // same secret, negative TTL: mints an already-expired token
    let mut config = TokenConfig::new(SECRET);
    config.access_ttl = Duration::seconds(-60);
    let expired_minter =
        TokenService::new(config, Arc::new(RevocationList::new())).unwrap();
    let token = expired_minter
        .issue_access_token(Uuid::new_v4(), Role::User)
        .unwrap();

    let app = parento_api::router(state);
    let resp = app
        .oneshot(me_request(Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoked_token_is_401_and_indistinguishable_from_invalid() {
    let state = test_state();
    let token = state
        .tokens
        .issue_access_token(Uuid::new_v4(), Role::User)
        .unwrap();
    state.tokens.revoke(&token).unwrap();

    let app = parento_api::router(state);

    let revoked_resp = app
        .clone()
        .oneshot(me_request(Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(revoked_resp.status(), StatusCode::UNAUTHORIZED);
    let revoked_json = body_json(revoked_resp).await;

    let invalid_resp = app
        .oneshot(me_request(Some("Bearer not-a-jwt")))
        .await
        .unwrap();
    let invalid_json = body_json(invalid_resp).await;

    // revocation must not leak through the response body
    assert_eq!(revoked_json, invalid_json);
}
