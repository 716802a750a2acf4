#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use bitchore_api::auth::jwt::{generate_access_token, JwtConfig};
use bitchore_api::auth::password::hash_password;
use bitchore_api::config::ServerConfig;
use bitchore_api::router::build_app_router;
use bitchore_api::state::AppState;
use bitchore_core::chore::{ChecklistItem, Chore, ChoreFields, NewChore};
use bitchore_core::roles::Role;
use bitchore_db::models::user::{CreateUser, User};
use bitchore_db::repositories::{ChoreRepo, UserRepo};

pub const TEST_PASSWORD: &str = "password123";
pub const TEST_INVITE_TOKEN: &str = "household-admin-invite";

/// Test configuration with a fixed secret and invite token.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        admin_invite_token: Some(TEST_INVITE_TOKEN.to_string()),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// The production router and middleware stack over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(test_config()),
    })
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user whose password is [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, name: &str, role: Role) -> User {
    let input = CreateUser {
        name: name.to_string(),
        email: format!("{}@home.test", name.to_lowercase()),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role,
        profile_image_url: None,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Insert a chore directly, bypassing the API.
pub async fn create_chore(
    pool: &PgPool,
    created_by: &User,
    title: &str,
    assigned_to: &[&User],
    checklist: &[&str],
) -> Chore {
    let fields = ChoreFields {
        title: title.to_string(),
        description: format!("{title} description"),
        assigned_to: assigned_to.iter().map(|u| u.id).collect(),
        todo_checklist: checklist.iter().map(|t| ChecklistItem::new(*t)).collect(),
        ..Default::default()
    };
    ChoreRepo::create(pool, &NewChore::new(created_by.id, fields))
        .await
        .expect("chore creation should succeed")
}

pub fn token_for(user: &User) -> String {
    let role = user.role().expect("fixture users have valid roles");
    generate_access_token(user.id, role, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
