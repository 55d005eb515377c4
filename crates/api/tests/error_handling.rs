//! Tests for `AppError` -> HTTP response mapping, plus request bodies the
//! JSON extractor refuses.

mod common;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::response::IntoResponse;
use common::{body_json, TestApp};
use http_body_util::BodyExt;
use warden_api::error::AppError;
use warden_core::error::CoreError;
use warden_core::validation::FieldErrors;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Role",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Role with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_400_with_fields() {
    let mut fields = FieldErrors::new();
    fields.add("code", "Ensure this field has 1 to 7 characters.");
    fields.add("name", "This field is required.");

    let (status, json) = error_to_response(AppError::Core(CoreError::Validation(fields))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Validation failed");
    assert_eq!(json["fields"]["code"][0], "Ensure this field has 1 to 7 characters.");
    assert_eq!(json["fields"]["name"][0], "This field is required.");
}

#[tokio::test]
async fn invalid_state_returns_400_with_message_verbatim() {
    let err = AppError::Core(CoreError::InvalidState(
        "The person does not have this role.".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_STATE");
    assert_eq!(json["error"], "The person does not have this role.");
    assert!(json.get("fields").is_none());
}

#[tokio::test]
async fn http_not_found_returns_404() {
    let err = AppError::NotFound("No Role matches the given query.".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No Role matches the given query.");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("Password hashing error: salt too short".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Extractor rejections reach clients in the same JSON envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_json_body_returns_400() {
    let ctx = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/roles")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = common::send(ctx.app(), request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn missing_content_type_returns_400() {
    let ctx = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/permissions")
        .body(Body::from("{\"code\": \"read\", \"name\": \"Read\"}"))
        .unwrap();

    let response = common::send(ctx.app(), request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn wrongly_typed_field_returns_400() {
    let ctx = TestApp::new();
    let role = common::create_role(&ctx, "Viewer").await;

    let response = common::post_json(
        ctx.app(),
        &format!("/api/v1/roles/{role}/add_permission"),
        serde_json::json!({"permission_id": "one"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
