//! Integration tests for the `/templates` and `/templates/{id}/layouts`
//! endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete, get, get_as, json_request, patch_json, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_template_applies_canvas_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/templates", json!({ "name": "Poster" })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Poster");
    assert_eq!(json["data"]["width"], 800.0);
    assert_eq!(json["data"]["height"], 600.0);
    assert_eq!(json["data"]["owner_id"], common::USER);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_template_reports_every_invalid_field(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/templates",
        json!({ "name": "", "width": -5.0, "height": 0.0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["height", "name", "width"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_returns_only_own_templates(pool: PgPool) {
    common::create_template(&pool, "Mine").await;
    json_request(
        common::build_test_app(pool.clone()),
        Method::POST,
        "/api/v1/templates",
        json!({ "name": "Theirs" }),
        2,
    )
    .await;

    let response = get(common::build_test_app(pool), "/api/v1/templates").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Mine"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_template_is_forbidden(pool: PgPool) {
    let id = common::create_template(&pool, "Private").await;

    let response = get_as(
        common::build_test_app(pool),
        &format!("/api/v1/templates/{id}"),
        2,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_template_returns_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/templates/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn put_and_patch_are_partial(pool: PgPool) {
    let id = common::create_template(&pool, "Draft").await;
    let uri = format!("/api/v1/templates/{id}");

    let response = put_json(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "width": 1024.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Draft");
    assert_eq!(json["data"]["width"], 1024.0);

    let response = patch_json(
        common::build_test_app(pool),
        &uri,
        json!({ "name": "Final", "owner_id": 2 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Final");
    assert_eq!(json["data"]["width"], 1024.0);
    assert_eq!(json["data"]["owner_id"], common::USER);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_template_then_get_returns_404(pool: PgPool) {
    let (template_id, _) = common::create_layout(&pool).await;
    let uri = format!("/api/v1/templates/{template_id}");

    let response = delete(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let layouts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM layouts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(layouts, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn template_expands_layouts_and_shapes(pool: PgPool) {
    let (template_id, layout_id) = common::create_layout(&pool).await;
    post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/templates/{template_id}/layouts/{layout_id}/shapes"),
        json!({ "type": "Circle", "config": { "radius": 12.0 } }),
    )
    .await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/templates/{template_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let layouts = json["data"]["layouts"].as_array().unwrap();
    assert_eq!(layouts.len(), 1);
    assert_eq!(layouts[0]["id"], layout_id);
    assert_eq!(layouts[0]["shapes"][0]["type"], "v-circle");
    assert_eq!(layouts[0]["shapes"][0]["config"]["radius"], 12.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn data_endpoint_returns_the_canvas_document(pool: PgPool) {
    let (template_id, layout_id) = common::create_layout(&pool).await;
    post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/templates/{template_id}/layouts/{layout_id}/shapes"),
        json!({ "type": "Rect", "config": { "width": 10.0, "height": 20.0 } }),
    )
    .await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/templates/{template_id}/data"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["name"], "Canvas");
    assert_eq!(data["width"], 800.0);
    assert_eq!(data["height"], 600.0);
    assert_eq!(data["layouts"][0]["id"], layout_id);
    assert_eq!(data["layouts"][0]["shapes"][0]["type"], "v-rect");
    assert!(data.get("owner_id").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn layouts_are_listed_in_creation_order(pool: PgPool) {
    let (template_id, first) = common::create_layout(&pool).await;
    let uri = format!("/api/v1/templates/{template_id}/layouts");
    let response = post_json(common::build_test_app(pool.clone()), &uri, json!({})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let second = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get(common::build_test_app(pool), &uri).await;
    let json = body_json(response).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [first, second]);
    assert_eq!(json["data"][0]["shapes"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn layout_of_another_template_returns_404(pool: PgPool) {
    let (_, layout_id) = common::create_layout(&pool).await;
    let other = common::create_template(&pool, "Other").await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/templates/{other}/layouts/{layout_id}"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn updating_a_layout_is_not_allowed(pool: PgPool) {
    let (template_id, layout_id) = common::create_layout(&pool).await;

    let response = put_json(
        common::build_test_app(pool),
        &format!("/api/v1/templates/{template_id}/layouts/{layout_id}"),
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "GET, DELETE");
    let json = body_json(response).await;
    assert_eq!(json["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(json["allowed"], json!(["GET", "DELETE"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_layout_removes_its_shapes(pool: PgPool) {
    let (template_id, layout_id) = common::create_layout(&pool).await;
    post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/templates/{template_id}/layouts/{layout_id}/shapes"),
        json!({ "type": "Circle", "config": { "radius": 1.0 } }),
    )
    .await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/templates/{template_id}/layouts/{layout_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let shapes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shapes")
        .fetch_one(&pool)
        .await
        .unwrap();
    let circles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM circles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((shapes, circles), (0, 0));
}
