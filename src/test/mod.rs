//! End-to-end tests over the full HTTP surface.

use crate::api::models::users::Role;
use crate::db::handlers::{Categories, Repository};
use crate::db::models::categories::{CategoryCreateDBRequest, CategoryDBResponse};
use crate::test_utils::{TEST_PASSWORD, auth_header_for, create_test_admin_user, create_test_app, create_test_config, create_test_user};
use axum::http::StatusCode;
use sqlx::SqlitePool;
use uuid::Uuid;

async fn seed_category(pool: &SqlitePool, slug: &str) -> CategoryDBResponse {
    let mut conn = pool.acquire().await.unwrap();
    let mut repo = Categories::new(&mut conn);
    repo.create(&CategoryCreateDBRequest {
        slug: slug.to_string(),
        name: slug.to_string(),
        description: None,
    })
    .await
    .unwrap()
}

fn tool_body(name: &str, slug: &str, category_id: Uuid) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "slug": slug,
        "description": format!("{name} description"),
        "pricing_model": "FREEMIUM",
        "has_free_version": true,
        "category_ids": [category_id],
        "platforms": ["WEB"],
    })
}

/// Create a tool through the admin API and return its response body.
async fn create_tool_via_api(
    server: &axum_test::TestServer,
    admin_header: &(String, String),
    body: serde_json::Value,
) -> serde_json::Value {
    let response = server
        .post("/api/v1/tools")
        .add_header(&admin_header.0, &admin_header.1)
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[sqlx::test]
#[test_log::test]
async fn test_healthz(pool: SqlitePool) {
    let server = create_test_app(pool);
    let response = server.get("/healthz").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[sqlx::test]
#[test_log::test]
async fn test_tool_listing_paginates_without_overlap(pool: SqlitePool) {
    let config = create_test_config();
    let admin = create_test_admin_user(&pool).await;
    let header = auth_header_for(&admin, &config);
    let category = seed_category(&pool, "writing").await;
    let server = create_test_app(pool);

    for i in 0..5 {
        create_tool_via_api(&server, &header, tool_body(&format!("Tool {i}"), &format!("tool-{i}"), category.id)).await;
    }

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let path = match &cursor {
            Some(c) => format!("/api/v1/tools?limit=2&cursor={c}"),
            None => "/api/v1/tools?limit=2".to_string(),
        };
        let response = server.get(&path).await;
        response.assert_status_ok();
        let page: serde_json::Value = response.json();

        for item in page["items"].as_array().unwrap() {
            seen.push(item["slug"].as_str().unwrap().to_string());
        }

        match page["next_cursor"].as_str() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    assert_eq!(seen.len(), 5, "every tool appears exactly once: {seen:?}");
    let unique: std::collections::HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), 5);
    // Newest first
    assert_eq!(seen.first().unwrap(), "tool-4");
    assert_eq!(seen.last().unwrap(), "tool-0");
}

#[sqlx::test]
#[test_log::test]
async fn test_unknown_cursor_is_rejected(pool: SqlitePool) {
    let server = create_test_app(pool);
    let response = server.get(&format!("/api/v1/tools?cursor={}", Uuid::new_v4())).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
#[test_log::test]
async fn test_filtered_listing_composes_filters(pool: SqlitePool) {
    let config = create_test_config();
    let admin = create_test_admin_user(&pool).await;
    let header = auth_header_for(&admin, &config);
    let category = seed_category(&pool, "writing").await;
    let other_category = seed_category(&pool, "video").await;
    let server = create_test_app(pool);

    create_tool_via_api(&server, &header, tool_body("Prose Helper", "prose-helper", category.id)).await;
    create_tool_via_api(&server, &header, tool_body("Prose Cutter", "prose-cutter", other_category.id)).await;

    let mut body = tool_body("Clip Maker", "clip-maker", category.id);
    body["pricing_model"] = serde_json::json!("PAID");
    body["has_free_version"] = serde_json::json!(false);
    create_tool_via_api(&server, &header, body).await;

    // Search alone matches both prose tools
    let response = server.get("/api/v1/tools/filtered?search=prose").await;
    response.assert_status_ok();
    let page: serde_json::Value = response.json();
    assert_eq!(page["items"].as_array().unwrap().len(), 2);

    // Adding a category filter narrows it down to one
    let response = server.get("/api/v1/tools/filtered?search=prose&categories=writing").await;
    let page: serde_json::Value = response.json();
    let items = page["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["slug"], "prose-helper");

    // Pricing filter applies on top
    let response = server.get("/api/v1/tools/filtered?categories=writing&pricing_models=PAID").await;
    let page: serde_json::Value = response.json();
    let items = page["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["slug"], "clip-maker");

    // Unknown pricing model is a client error
    let response = server.get("/api/v1/tools/filtered?pricing_models=LIFETIME").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
#[test_log::test]
async fn test_tool_detail_and_view_count(pool: SqlitePool) {
    let config = create_test_config();
    let admin = create_test_admin_user(&pool).await;
    let header = auth_header_for(&admin, &config);
    let category = seed_category(&pool, "writing").await;
    let server = create_test_app(pool);

    create_tool_via_api(&server, &header, tool_body("Prose Helper", "prose-helper", category.id)).await;

    let response = server.get("/api/v1/tools/prose-helper").await;
    response.assert_status_ok();
    let detail: serde_json::Value = response.json();
    assert_eq!(detail["view_count"], 0);
    assert_eq!(detail["categories"][0]["slug"], "writing");
    assert_eq!(detail["platforms"][0], "WEB");
    assert!(detail["reviews"].as_array().unwrap().is_empty());

    // The bump from the first fetch is visible on the second
    let response = server.get("/api/v1/tools/prose-helper").await;
    let detail: serde_json::Value = response.json();
    assert_eq!(detail["view_count"], 1);

    let response = server.get("/api/v1/tools/does-not-exist").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[test_log::test]
async fn test_tool_creation_requires_admin(pool: SqlitePool) {
    let config = create_test_config();
    let admin = create_test_admin_user(&pool).await;
    let user = create_test_user(&pool, "user@test.local", Role::User).await;
    let category = seed_category(&pool, "writing").await;
    let server = create_test_app(pool);

    let body = tool_body("Prose Helper", "prose-helper", category.id);

    // Anonymous
    let response = server.post("/api/v1/tools").json(&body).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Authenticated but not admin
    let user_header = auth_header_for(&user, &config);
    let response = server.post("/api/v1/tools").add_header(&user_header.0, &user_header.1).json(&body).await;
    response.assert_status(StatusCode::FORBIDDEN);

    // Admin succeeds, and the tool is retrievable afterwards
    let admin_header = auth_header_for(&admin, &config);
    let created = create_tool_via_api(&server, &admin_header, body).await;
    assert_eq!(created["slug"], "prose-helper");

    let response = server.get("/api/v1/tools/prose-helper").await;
    response.assert_status_ok();

    // Same slug again conflicts
    let response = server
        .post("/api/v1/tools")
        .add_header(&admin_header.0, &admin_header.1)
        .json(&tool_body("Prose Helper Again", "prose-helper", category.id))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[sqlx::test]
#[test_log::test]
async fn test_tool_creation_validates_input(pool: SqlitePool) {
    let config = create_test_config();
    let admin = create_test_admin_user(&pool).await;
    let header = auth_header_for(&admin, &config);
    let category = seed_category(&pool, "writing").await;
    let server = create_test_app(pool);

    // Uppercase slug
    let mut body = tool_body("Prose Helper", "Bad-Slug", category.id);
    let response = server.post("/api/v1/tools").add_header(&header.0, &header.1).json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Unknown category
    body = tool_body("Prose Helper", "prose-helper", Uuid::new_v4());
    let response = server.post("/api/v1/tools").add_header(&header.0, &header.1).json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Malformed website URL
    body = tool_body("Prose Helper", "prose-helper", category.id);
    body["website"] = serde_json::json!("not a url");
    let response = server.post("/api/v1/tools").add_header(&header.0, &header.1).json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // No categories at all
    body = tool_body("Prose Helper", "prose-helper", category.id);
    body["category_ids"] = serde_json::json!([]);
    let response = server.post("/api/v1/tools").add_header(&header.0, &header.1).json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
#[test_log::test]
async fn test_search_requires_query(pool: SqlitePool) {
    let config = create_test_config();
    let admin = create_test_admin_user(&pool).await;
    let header = auth_header_for(&admin, &config);
    let category = seed_category(&pool, "writing").await;
    let server = create_test_app(pool);

    create_tool_via_api(&server, &header, tool_body("Prose Helper", "prose-helper", category.id)).await;

    let response = server.get("/api/v1/tools/search?q=%20%20").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/v1/tools/search?q=prose").await;
    response.assert_status_ok();
    let results: serde_json::Value = response.json();
    assert_eq!(results[0]["slug"], "prose-helper");
}

#[sqlx::test]
#[test_log::test]
async fn test_category_listing_and_detail(pool: SqlitePool) {
    let config = create_test_config();
    let admin = create_test_admin_user(&pool).await;
    let header = auth_header_for(&admin, &config);
    let category = seed_category(&pool, "writing").await;
    seed_category(&pool, "video").await;
    let server = create_test_app(pool);

    create_tool_via_api(&server, &header, tool_body("Prose Helper", "prose-helper", category.id)).await;

    let response = server.get("/api/v1/categories").await;
    response.assert_status_ok();
    let categories: serde_json::Value = response.json();
    let list = categories.as_array().unwrap();
    assert_eq!(list.len(), 2);
    // Alphabetical with counts
    assert_eq!(list[0]["slug"], "video");
    assert_eq!(list[0]["tool_count"], 0);
    assert_eq!(list[1]["slug"], "writing");
    assert_eq!(list[1]["tool_count"], 1);

    let response = server.get("/api/v1/categories/writing").await;
    response.assert_status_ok();
    let detail: serde_json::Value = response.json();
    assert_eq!(detail["slug"], "writing");
    assert_eq!(detail["tools"][0]["slug"], "prose-helper");

    let response = server.get("/api/v1/categories/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[test_log::test]
async fn test_use_case_creation_and_detail(pool: SqlitePool) {
    let config = create_test_config();
    let admin = create_test_admin_user(&pool).await;
    let header = auth_header_for(&admin, &config);
    let server = create_test_app(pool);

    let response = server
        .post("/api/v1/use-cases")
        .add_header(&header.0, &header.1)
        .json(&serde_json::json!({ "name": "Marketing", "slug": "marketing" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server.get("/api/v1/use-cases").await;
    let use_cases: serde_json::Value = response.json();
    assert_eq!(use_cases[0]["slug"], "marketing");

    let response = server.get("/api/v1/use-cases/marketing").await;
    response.assert_status_ok();
    let detail: serde_json::Value = response.json();
    assert_eq!(detail["name"], "Marketing");
    assert!(detail["tools"].as_array().unwrap().is_empty());

    // Anonymous creation is rejected
    let response = server
        .post("/api/v1/use-cases")
        .json(&serde_json::json!({ "name": "Sales", "slug": "sales" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
#[test_log::test]
async fn test_login_flow(pool: SqlitePool) {
    let user = create_test_user(&pool, "user@test.local", Role::User).await;
    let server = create_test_app(pool);

    // Wrong password: 401 and no cookie
    let response = server
        .post("/authentication/login")
        .json(&serde_json::json!({ "email": "user@test.local", "password": "wrong" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(response.headers().get("set-cookie").is_none());

    // Unknown email gets the same message as a wrong password
    let response = server
        .post("/authentication/login")
        .json(&serde_json::json!({ "email": "ghost@test.local", "password": TEST_PASSWORD }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.text(), "Invalid email or password");

    // Correct credentials: user body and a session cookie
    let response = server
        .post("/authentication/login")
        .json(&serde_json::json!({ "email": "user@test.local", "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["email"], "user@test.local");
    assert!(body.get("password_hash").is_none());

    let cookie = response.headers().get("set-cookie").unwrap().to_str().unwrap().to_string();
    assert!(cookie.starts_with("aidex_session="));
    assert!(cookie.contains("HttpOnly"));

    // The cookie authenticates /authentication/me
    let pair = cookie.split(';').next().unwrap().to_string();
    let response = server.get("/authentication/me").add_header("cookie", pair).await;
    response.assert_status_ok();
    let me: serde_json::Value = response.json();
    assert_eq!(me["id"], user.id.to_string());
    assert_eq!(me["role"], "USER");

    // Without credentials /authentication/me is a 401
    let response = server.get("/authentication/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Logout clears the cookie
    let response = server.post("/authentication/logout").await;
    response.assert_status_ok();
    let cleared = response.headers().get("set-cookie").unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[sqlx::test]
#[test_log::test]
async fn test_seeding_is_idempotent(pool: SqlitePool) {
    crate::seed_database(&pool).await.unwrap();
    crate::seed_database(&pool).await.unwrap();

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 7);

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM use_cases")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 6);
}

#[sqlx::test]
#[test_log::test]
async fn test_initial_admin_user_is_idempotent(pool: SqlitePool) {
    let config = create_test_config();

    let first = crate::create_initial_admin_user("admin@test.local", Some("first-password"), &config, &pool)
        .await
        .unwrap();
    let second = crate::create_initial_admin_user("admin@test.local", Some("second-password"), &config, &pool)
        .await
        .unwrap();
    assert_eq!(first, second);

    // Latest configured password wins
    let server = create_test_app(pool);
    let response = server
        .post("/authentication/login")
        .json(&serde_json::json!({ "email": "admin@test.local", "password": "second-password" }))
        .await;
    response.assert_status_ok();
}
