//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use uptemplate_api::error::AppError;
use uptemplate_core::blob::BlobError;
use uptemplate_core::error::CoreError;
use uptemplate_core::validation::FieldViolation;
use uptemplate_db::DbError;

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
        entity: "Shape",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Shape with id 42 not found");
}

#[tokio::test]
async fn unknown_kind_returns_400() {
    let err = AppError::Core(CoreError::UnknownKind("Polygon".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "UNKNOWN_KIND");
    assert_eq!(json["error"], "Unknown shape kind: Polygon");
}

#[tokio::test]
async fn invalid_fields_lists_every_violation() {
    let err = AppError::Core(CoreError::InvalidFields(vec![
        FieldViolation::new("width", "This field is required"),
        FieldViolation::new("opacity", "Must be between 0 and 1"),
    ]));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["fields"],
        serde_json::json!([
            { "field": "width", "message": "This field is required" },
            { "field": "opacity", "message": "Must be between 0 and 1" },
        ])
    );
}

#[tokio::test]
async fn referential_integrity_is_a_sanitized_500() {
    let err = AppError::from(DbError::Core(CoreError::ReferentialIntegrity {
        kind: 1,
        geometry_id: 9,
    }));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert!(!json.to_string().contains("geometry"));
}

#[tokio::test]
async fn method_not_allowed_enumerates_allowed_methods() {
    let err = AppError::MethodNotAllowed {
        allowed: &["GET", "DELETE"],
    };

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "GET, DELETE");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(json["allowed"], serde_json::json!(["GET", "DELETE"]));
}

#[tokio::test]
async fn forbidden_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("Template belongs to another user".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn unauthorized_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Missing Authorization header".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid multipart body".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid multipart body");
}

#[tokio::test]
async fn blob_error_returns_500_and_sanitizes_message() {
    let err = AppError::Blob(BlobError::InvalidReference("/etc/passwd".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_core_error_returns_500_and_sanitizes_message() {
    let err = AppError::Core(CoreError::Internal("secret database credentials leaked".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let err = AppError::Database(sqlx::Error::RowNotFound);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
