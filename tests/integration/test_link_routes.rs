//! User link route tests: ownership gates, icon normalization and per-user
//! reordering.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use uuid::Uuid;

use altee_api::middleware::create_rate_limiter;
use altee_api::models::Role;
use altee_api::routes::{AppState, create_api_router};
use altee_api::services::jwt_service::JwtService;
use altee_api::storage::{MIGRATOR, SqliteStorage};

static JWT: Lazy<JwtService> = Lazy::new(|| JwtService::new("test-secret-key-at-least-32-chars"));

async fn create_test_server() -> TestServer {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();

    let state = AppState::new(
        Arc::new(SqliteStorage::new(pool)),
        Arc::new(JWT.clone()),
        create_rate_limiter(10_000),
    );
    TestServer::new(create_api_router().with_state(state)).unwrap()
}

fn bearer(role: Role) -> String {
    JWT.generate_token(Uuid::new_v4(), role).unwrap()
}

async fn create_service(server: &TestServer, admin_token: &str) -> String {
    let response = server
        .post("/services")
        .authorization_bearer(admin_token)
        .json(&json!({"name": "Twitter", "slug": "twitter"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    body["service"]["id"].as_str().unwrap().to_string()
}

async fn create_link(server: &TestServer, token: &str, service_id: &str) -> String {
    let response = server
        .post("/links")
        .authorization_bearer(token)
        .json(&json!({
            "service_id": service_id,
            "url": "https://twitter.com/someone"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    body["link"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_links_require_authentication() {
    let server = create_test_server().await;

    let response = server.get("/links").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_own_links() {
    let server = create_test_server().await;
    let admin_token = bearer(Role::Admin);
    let user_token = bearer(Role::User);
    let service_id = create_service(&server, &admin_token).await;

    let response = server
        .post("/links")
        .authorization_bearer(&user_token)
        .json(&json!({
            "service_id": service_id,
            "url": "https://twitter.com/someone",
            "title": "find me"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["link"]["sort_order"], 1);
    assert_eq!(body["link"]["use_original_icon"], false);

    let response = server
        .get("/links")
        .authorization_bearer(&user_token)
        .await;
    let body: Value = response.json();
    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["title"], "find me");

    // Another user's listing is empty; links are never shared.
    let response = server
        .get("/links")
        .authorization_bearer(&bearer(Role::User))
        .await;
    let body: Value = response.json();
    assert_eq!(body["links"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_link_with_empty_icon_id_stores_null() {
    let server = create_test_server().await;
    let admin_token = bearer(Role::Admin);
    let user_token = bearer(Role::User);
    let service_id = create_service(&server, &admin_token).await;

    let response = server
        .post("/links")
        .authorization_bearer(&user_token)
        .json(&json!({
            "service_id": service_id,
            "url": "https://twitter.com/someone",
            "icon_id": ""
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["link"]["icon_id"].is_null());
}

#[tokio::test]
async fn test_patch_with_empty_icon_id_clears_icon() {
    let server = create_test_server().await;
    let admin_token = bearer(Role::Admin);
    let user_token = bearer(Role::User);
    let service_id = create_service(&server, &admin_token).await;

    let response = server
        .post("/icons")
        .authorization_bearer(&admin_token)
        .json(&json!({
            "name": "Bird",
            "service_id": service_id,
            "file_path": "icons/bird.png",
            "style": "FILLED",
            "color_scheme": "ORIGINAL"
        }))
        .await;
    let body: Value = response.json();
    let icon_id = body["icon"]["id"].as_str().unwrap().to_string();

    let response = server
        .post("/links")
        .authorization_bearer(&user_token)
        .json(&json!({
            "service_id": service_id,
            "url": "https://twitter.com/someone",
            "icon_id": icon_id
        }))
        .await;
    let body: Value = response.json();
    let link_id = body["link"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["link"]["icon_id"], icon_id.as_str());

    let response = server
        .patch(&format!("/links/{}", link_id))
        .authorization_bearer(&user_token)
        .json(&json!({"icon_id": ""}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["link"]["icon_id"].is_null());
}

#[tokio::test]
async fn test_non_owner_cannot_mutate_a_link() {
    let server = create_test_server().await;
    let admin_token = bearer(Role::Admin);
    let owner_token = bearer(Role::User);
    let stranger_token = bearer(Role::User);
    let service_id = create_service(&server, &admin_token).await;
    let link_id = create_link(&server, &owner_token, &service_id).await;

    // A perfectly valid payload does not help a non-owner.
    let response = server
        .patch(&format!("/links/{}", link_id))
        .authorization_bearer(&stranger_token)
        .json(&json!({"title": "mine now"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = server
        .delete(&format!("/links/{}", link_id))
        .authorization_bearer(&stranger_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // Administrators do not get a bypass either; links are owner-only.
    let response = server
        .delete(&format!("/links/{}", link_id))
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = server
        .get("/links")
        .authorization_bearer(&owner_token)
        .await;
    let body: Value = response.json();
    assert_eq!(body["links"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_owner_can_update_and_delete() {
    let server = create_test_server().await;
    let admin_token = bearer(Role::Admin);
    let user_token = bearer(Role::User);
    let service_id = create_service(&server, &admin_token).await;
    let link_id = create_link(&server, &user_token, &service_id).await;

    let response = server
        .patch(&format!("/links/{}", link_id))
        .authorization_bearer(&user_token)
        .json(&json!({"title": "updated", "is_active": false}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["link"]["title"], "updated");
    assert_eq!(body["link"]["is_active"], false);

    let response = server
        .delete(&format!("/links/{}", link_id))
        .authorization_bearer(&user_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .get("/links")
        .authorization_bearer(&user_token)
        .await;
    let body: Value = response.json();
    assert_eq!(body["links"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_reorder_own_links() {
    let server = create_test_server().await;
    let admin_token = bearer(Role::Admin);
    let user_token = bearer(Role::User);
    let service_id = create_service(&server, &admin_token).await;

    let first = create_link(&server, &user_token, &service_id).await;
    let second = create_link(&server, &user_token, &service_id).await;

    let response = server
        .patch("/links/reorder")
        .authorization_bearer(&user_token)
        .json(&json!({
            "entries": [
                {"id": first, "sort_order": 2},
                {"id": second, "sort_order": 1},
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .get("/links")
        .authorization_bearer(&user_token)
        .await;
    let body: Value = response.json();
    let links = body["links"].as_array().unwrap();
    assert_eq!(links[0]["id"], second.as_str());
    assert_eq!(links[1]["id"], first.as_str());
}

#[tokio::test]
async fn test_reorder_rejects_empty_and_foreign_lists() {
    let server = create_test_server().await;
    let admin_token = bearer(Role::Admin);
    let owner_token = bearer(Role::User);
    let stranger_token = bearer(Role::User);
    let service_id = create_service(&server, &admin_token).await;
    let link_id = create_link(&server, &owner_token, &service_id).await;

    let response = server
        .patch("/links/reorder")
        .authorization_bearer(&owner_token)
        .json(&json!({"entries": []}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Another user's link id is invisible to this scope.
    let response = server
        .patch("/links/reorder")
        .authorization_bearer(&stranger_token)
        .json(&json!({
            "entries": [{"id": link_id, "sort_order": 1}]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .get("/links")
        .authorization_bearer(&owner_token)
        .await;
    let body: Value = response.json();
    assert_eq!(body["links"][0]["sort_order"], 1);
}
