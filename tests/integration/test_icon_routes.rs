//! Icon library route tests: admin gating, enum validation, per-service
//! listing visibility and scoped reordering.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use uuid::Uuid;

use altee_api::middleware::create_rate_limiter;
use altee_api::models::Role;
use altee_api::routes::{AppState, create_api_router};
use altee_api::services::jwt_service::JwtService;
use altee_api::storage::{MIGRATOR, SqliteStorage};

const TEST_SECRET: &str = "test-secret-key-at-least-32-chars";

async fn create_test_server() -> (TestServer, AppState) {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();

    let state = AppState::new(
        Arc::new(SqliteStorage::new(pool)),
        Arc::new(JwtService::new(TEST_SECRET)),
        create_rate_limiter(10_000),
    );
    let server = TestServer::new(create_api_router().with_state(state.clone())).unwrap();
    (server, state)
}

fn bearer(state: &AppState, role: Role) -> String {
    state
        .jwt_service
        .generate_token(Uuid::new_v4(), role)
        .unwrap()
}

async fn create_service(server: &TestServer, admin_token: &str, name: &str, slug: &str) -> String {
    let response = server
        .post("/services")
        .authorization_bearer(admin_token)
        .json(&json!({"name": name, "slug": slug}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    body["service"]["id"].as_str().unwrap().to_string()
}

async fn create_icon(
    server: &TestServer,
    admin_token: &str,
    service_id: &str,
    name: &str,
) -> String {
    let response = server
        .post("/icons")
        .authorization_bearer(admin_token)
        .json(&json!({
            "name": name,
            "service_id": service_id,
            "file_path": format!("icons/{}.png", name),
            "style": "FILLED",
            "color_scheme": "ORIGINAL"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    body["icon"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_icon_requires_admin_role() {
    let (server, state) = create_test_server().await;
    let admin_token = bearer(&state, Role::Admin);
    let user_token = bearer(&state, Role::User);
    let service_id = create_service(&server, &admin_token, "Twitter", "twitter").await;

    let response = server
        .post("/icons")
        .authorization_bearer(&user_token)
        .json(&json!({
            "name": "Bird",
            "service_id": service_id,
            "file_path": "icons/bird.png",
            "style": "FILLED",
            "color_scheme": "ORIGINAL"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_icon_validates_enums() {
    let (server, state) = create_test_server().await;
    let admin_token = bearer(&state, Role::Admin);
    let service_id = create_service(&server, &admin_token, "Twitter", "twitter").await;

    let response = server
        .post("/icons")
        .authorization_bearer(&admin_token)
        .json(&json!({
            "name": "Bird",
            "service_id": service_id,
            "file_path": "icons/bird.png",
            "style": "SKETCHY",
            "color_scheme": "ORIGINAL"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "style"));
}

#[tokio::test]
async fn test_create_icon_rejects_unknown_service() {
    let (server, state) = create_test_server().await;
    let admin_token = bearer(&state, Role::Admin);

    let response = server
        .post("/icons")
        .authorization_bearer(&admin_token)
        .json(&json!({
            "name": "Bird",
            "service_id": Uuid::new_v4().to_string(),
            "file_path": "icons/bird.png",
            "style": "FILLED",
            "color_scheme": "ORIGINAL"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_icon_listing_hides_inactive_from_users() {
    let (server, state) = create_test_server().await;
    let admin_token = bearer(&state, Role::Admin);
    let user_token = bearer(&state, Role::User);
    let service_id = create_service(&server, &admin_token, "Twitter", "twitter").await;

    create_icon(&server, &admin_token, &service_id, "bird").await;
    let hidden_id = create_icon(&server, &admin_token, &service_id, "egg").await;

    server
        .patch(&format!("/icons/{}", hidden_id))
        .authorization_bearer(&admin_token)
        .json(&json!({"is_active": false}))
        .await;

    let response = server
        .get(&format!("/services/{}/icons", service_id))
        .authorization_bearer(&user_token)
        .await;
    let body: Value = response.json();
    let icons = body["icons"].as_array().unwrap();
    assert_eq!(icons.len(), 1);
    assert_eq!(icons[0]["name"], "bird");

    let response = server
        .get(&format!("/services/{}/icons", service_id))
        .authorization_bearer(&admin_token)
        .await;
    let body: Value = response.json();
    assert_eq!(body["icons"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_icon() {
    let (server, state) = create_test_server().await;
    let admin_token = bearer(&state, Role::Admin);
    let service_id = create_service(&server, &admin_token, "Twitter", "twitter").await;
    let icon_id = create_icon(&server, &admin_token, &service_id, "bird").await;

    let response = server
        .patch(&format!("/icons/{}", icon_id))
        .authorization_bearer(&admin_token)
        .json(&json!({"name": "blue-bird", "style": "OUTLINE"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["icon"]["name"], "blue-bird");
    assert_eq!(body["icon"]["style"], "OUTLINE");

    let response = server
        .patch(&format!("/icons/{}", Uuid::new_v4()))
        .authorization_bearer(&admin_token)
        .json(&json!({"name": "ghost"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_icon_in_use_maps_to_bad_request() {
    let (server, state) = create_test_server().await;
    let admin_token = bearer(&state, Role::Admin);
    let user_token = bearer(&state, Role::User);
    let service_id = create_service(&server, &admin_token, "Twitter", "twitter").await;
    let icon_id = create_icon(&server, &admin_token, &service_id, "bird").await;

    let response = server
        .post("/links")
        .authorization_bearer(&user_token)
        .json(&json!({
            "service_id": service_id,
            "url": "https://twitter.com/someone",
            "icon_id": icon_id
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let link_id = body["link"]["id"].as_str().unwrap().to_string();

    let response = server
        .delete(&format!("/icons/{}", icon_id))
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    server
        .delete(&format!("/links/{}", link_id))
        .authorization_bearer(&user_token)
        .await;

    let response = server
        .delete(&format!("/icons/{}", icon_id))
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_reorder_icons_is_scoped_to_one_service() {
    let (server, state) = create_test_server().await;
    let admin_token = bearer(&state, Role::Admin);

    let twitter = create_service(&server, &admin_token, "Twitter", "twitter").await;
    let github = create_service(&server, &admin_token, "GitHub", "github").await;

    let twitter_icon = create_icon(&server, &admin_token, &twitter, "bird").await;
    let github_icon = create_icon(&server, &admin_token, &github, "octocat").await;

    // An icon from another service cannot be moved through this scope.
    let response = server
        .patch("/icons/reorder")
        .authorization_bearer(&admin_token)
        .json(&json!({
            "service_id": twitter,
            "entries": [
                {"id": twitter_icon, "sort_order": 2},
                {"id": github_icon, "sort_order": 1},
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // The failed batch left the original order untouched.
    let response = server
        .get(&format!("/services/{}/icons", twitter))
        .authorization_bearer(&admin_token)
        .await;
    let body: Value = response.json();
    assert_eq!(body["icons"][0]["sort_order"], 1);
}
