//! HTTP-level tests for the `/permissions` resource.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, patch_json, post_json, put_json, TestApp};
use serde_json::json;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_permission_returns_201() {
    let ctx = TestApp::new();
    let response = post_json(
        ctx.app(),
        "/api/v1/permissions",
        json!({"code": "perm_1", "name": "Permission 1"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].is_number());
    assert_eq!(json["code"], "perm_1");
    assert_eq!(json["name"], "Permission 1");
    assert!(json["created_at"].is_string());
}

#[tokio::test]
async fn test_create_permission_with_long_code_is_rejected() {
    let ctx = TestApp::new();
    let response = post_json(
        ctx.app(),
        "/api/v1/permissions",
        json!({"code": "too_long_code", "name": "Too long"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["fields"]["code"][0],
        "Ensure this field has 1 to 7 characters."
    );
}

#[tokio::test]
async fn test_create_permission_with_duplicate_code_is_rejected() {
    let ctx = TestApp::new();
    common::create_permission(&ctx, "perm_1", "Permission 1").await;

    let response = post_json(
        ctx.app(),
        "/api/v1/permissions",
        json!({"code": "perm_1", "name": "Another"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["fields"]["code"][0],
        "permission with this code already exists."
    );
}

#[tokio::test]
async fn test_create_permission_missing_field_is_rejected() {
    let ctx = TestApp::new();
    let response = post_json(ctx.app(), "/api/v1/permissions", json!({"code": "perm_1"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_permissions_in_id_order() {
    let ctx = TestApp::new();
    let first = common::create_permission(&ctx, "b_perm", "B").await;
    let second = common::create_permission(&ctx, "a_perm", "A").await;

    let response = get(ctx.app(), "/api/v1/permissions").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let ids: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn test_list_permissions_empty() {
    let ctx = TestApp::new();
    let response = get(ctx.app(), "/api/v1/permissions").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_get_permission_by_id() {
    let ctx = TestApp::new();
    let id = common::create_permission(&ctx, "read", "Read").await;

    let response = get(ctx.app(), &format!("/api/v1/permissions/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["code"], "read");
}

#[tokio::test]
async fn test_get_nonexistent_permission_returns_404() {
    let ctx = TestApp::new();
    let response = get(ctx.app(), "/api/v1/permissions/9999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Permission with id 9999 not found");
}

#[tokio::test]
async fn test_trailing_slash_resolves_to_same_route() {
    let ctx = TestApp::new();
    let id = common::create_permission(&ctx, "read", "Read").await;

    let response = get(ctx.app(), "/api/v1/permissions/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = get(ctx.app(), &format!("/api/v1/permissions/{id}/")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_patch_permission_changes_only_given_fields() {
    let ctx = TestApp::new();
    let id = common::create_permission(&ctx, "read", "Read").await;

    let response = patch_json(
        ctx.app(),
        &format!("/api/v1/permissions/{id}"),
        json!({"name": "Read everything"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["code"], "read");
    assert_eq!(json["name"], "Read everything");
}

#[tokio::test]
async fn test_put_permission_replaces_fields() {
    let ctx = TestApp::new();
    let id = common::create_permission(&ctx, "read", "Read").await;

    let response = put_json(
        ctx.app(),
        &format!("/api/v1/permissions/{id}"),
        json!({"code": "write", "name": "Write"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["code"], "write");
    assert_eq!(json["name"], "Write");
}

#[tokio::test]
async fn test_put_permission_requires_every_field() {
    let ctx = TestApp::new();
    let id = common::create_permission(&ctx, "read", "Read").await;

    let response = put_json(
        ctx.app(),
        &format!("/api/v1/permissions/{id}"),
        json!({"name": "Only a name"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_permission_to_taken_code_is_rejected() {
    let ctx = TestApp::new();
    common::create_permission(&ctx, "read", "Read").await;
    let id = common::create_permission(&ctx, "write", "Write").await;

    let response = patch_json(
        ctx.app(),
        &format!("/api/v1/permissions/{id}"),
        json!({"code": "read"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["fields"]["code"][0],
        "permission with this code already exists."
    );
}

#[tokio::test]
async fn test_patch_nonexistent_permission_returns_404() {
    let ctx = TestApp::new();
    let response = patch_json(
        ctx.app(),
        "/api/v1/permissions/9999",
        json!({"name": "Nobody"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_permission_with_invalid_body_returns_404() {
    let ctx = TestApp::new();

    let response = patch_json(ctx.app(), "/api/v1/permissions/9999", json!({"code": ""})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Permission with id 9999 not found"
    );

    let response = put_json(ctx.app(), "/api/v1/permissions/9999", json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_integer_id_returns_404_json() {
    let ctx = TestApp::new();
    let response = get(ctx.app(), "/api/v1/permissions/abc").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_permission_returns_204() {
    let ctx = TestApp::new();
    let id = common::create_permission(&ctx, "read", "Read").await;

    let response = delete(ctx.app(), &format!("/api/v1/permissions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Subsequent GET should 404.
    let response = get(ctx.app(), &format!("/api/v1/permissions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_nonexistent_permission_returns_404() {
    let ctx = TestApp::new();
    let response = delete(ctx.app(), "/api/v1/permissions/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
