//! Route definitions for the `/templates` resource and the layouts and
//! shapes nested under it.

use axum::routing::get;
use axum::Router;

use super::not_allowed;
use crate::handlers::{layouts, shapes, templates};
use crate::state::AppState;

const COLLECTION_METHODS: &[&str] = &["GET", "POST"];
const TEMPLATE_METHODS: &[&str] = &["GET", "PUT", "PATCH", "DELETE"];
const LAYOUT_METHODS: &[&str] = &["GET", "DELETE"];
const SHAPE_METHODS: &[&str] = &["GET", "PUT", "PATCH", "DELETE"];

/// Routes mounted at `/templates`.
///
/// ```text
/// GET    /                                                  -> list
/// POST   /                                                  -> create
/// GET    /{template_id}                                     -> get_by_id
/// PUT    /{template_id}                                     -> update
/// PATCH  /{template_id}                                     -> update
/// DELETE /{template_id}                                     -> delete
/// GET    /{template_id}/data                                -> get_data
///
/// GET    /{template_id}/layouts                             -> list
/// POST   /{template_id}/layouts                             -> create
/// GET    /{template_id}/layouts/{layout_id}                 -> get_by_id
/// DELETE /{template_id}/layouts/{layout_id}                 -> delete
///
/// GET    /{template_id}/layouts/{layout_id}/shapes          -> list
/// POST   /{template_id}/layouts/{layout_id}/shapes          -> create
/// GET    /{template_id}/layouts/{layout_id}/shapes/{shape_id} -> get_by_id
/// PUT    /{template_id}/layouts/{layout_id}/shapes/{shape_id} -> update
/// PATCH  /{template_id}/layouts/{layout_id}/shapes/{shape_id} -> update
/// DELETE /{template_id}/layouts/{layout_id}/shapes/{shape_id} -> delete
/// ```
pub fn router() -> Router<AppState> {
    let shape_routes = Router::new()
        .route(
            "/",
            get(shapes::list)
                .post(shapes::create)
                .fallback(not_allowed(COLLECTION_METHODS)),
        )
        .route(
            "/{shape_id}",
            get(shapes::get_by_id)
                .put(shapes::update)
                .patch(shapes::update)
                .delete(shapes::delete)
                .fallback(not_allowed(SHAPE_METHODS)),
        );

    let layout_routes = Router::new()
        .route(
            "/",
            get(layouts::list)
                .post(layouts::create)
                .fallback(not_allowed(COLLECTION_METHODS)),
        )
        .route(
            "/{layout_id}",
            get(layouts::get_by_id)
                .delete(layouts::delete)
                .fallback(not_allowed(LAYOUT_METHODS)),
        )
        .nest("/{layout_id}/shapes", shape_routes);

    Router::new()
        .route(
            "/",
            get(templates::list)
                .post(templates::create)
                .fallback(not_allowed(COLLECTION_METHODS)),
        )
        .route(
            "/{template_id}",
            get(templates::get_by_id)
                .put(templates::update)
                .patch(templates::update)
                .delete(templates::delete)
                .fallback(not_allowed(TEMPLATE_METHODS)),
        )
        .route(
            "/{template_id}/data",
            get(templates::get_data).fallback(not_allowed(&["GET"])),
        )
        .nest("/{template_id}/layouts", layout_routes)
}
