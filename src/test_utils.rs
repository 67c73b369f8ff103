//! Test utilities for integration testing (available with `test-utils` feature).

use crate::api::models::users::{CurrentUser, Role};
use crate::auth::{password, session};
use crate::db::handlers::{Repository, Users};
use crate::db::models::users::{UserCreateDBRequest, UserDBResponse};
use crate::{AppState, Config, build_router};
use axum_test::TestServer;
use sqlx::SqlitePool;

/// Password used for all users created through [`create_test_user`].
pub const TEST_PASSWORD: &str = "correct-horse-battery-staple";

pub fn create_test_config() -> Config {
    Config {
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        admin_email: "admin@test.local".to_string(),
        admin_password: None,
        seed_catalog: false,
        ..Default::default()
    }
}

/// Spin up a test server over the full router, backed by the given pool.
pub fn create_test_app(pool: SqlitePool) -> TestServer {
    let state = AppState::builder().db(pool).config(create_test_config()).build();
    let router = build_router(state).expect("Failed to build router");
    TestServer::new(router.into_make_service()).expect("Failed to create test server")
}

/// Create a user with [`TEST_PASSWORD`] as password.
pub async fn create_test_user(pool: &SqlitePool, email: &str, role: Role) -> UserDBResponse {
    let hash = password::hash_string(TEST_PASSWORD).expect("Failed to hash test password");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut users = Users::new(&mut conn);
    users
        .create(&UserCreateDBRequest {
            email: email.to_string(),
            name: Some("Test User".to_string()),
            image: None,
            role,
            password_hash: Some(hash),
        })
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_admin_user(pool: &SqlitePool) -> UserDBResponse {
    create_test_user(pool, "admin@test.local", Role::Admin).await
}

/// Bearer authorization header for the given user.
pub fn auth_header_for(user: &UserDBResponse, config: &Config) -> (String, String) {
    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
    };
    let token = session::create_session_token(&current, config).expect("Failed to create session token");
    ("authorization".to_string(), format!("Bearer {token}"))
}
