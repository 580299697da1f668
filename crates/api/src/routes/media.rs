//! Route definitions for the `/media` resource.

use axum::routing::get;
use axum::Router;

use super::not_allowed;
use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> upload (multipart)
/// GET    /{id}    -> get_by_id
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(media::list)
                .post(media::upload)
                .fallback(not_allowed(&["GET", "POST"])),
        )
        .route(
            "/{id}",
            get(media::get_by_id)
                .delete(media::delete)
                .fallback(not_allowed(&["GET", "DELETE"])),
        )
}
