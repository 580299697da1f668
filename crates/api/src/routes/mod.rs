pub mod health;
pub mod media;
pub mod templates;

use std::future::{ready, Ready};

use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /templates                                               list, create
/// /templates/{template_id}                                 get, update, delete
/// /templates/{template_id}/data                            denormalised projection
/// /templates/{template_id}/layouts                         list, create
/// /templates/{template_id}/layouts/{layout_id}             get, delete
/// /templates/{template_id}/layouts/{layout_id}/shapes      list, create
/// /templates/{template_id}/layouts/{layout_id}/shapes/{shape_id}
///                                                          get, update, delete
///
/// /media                                                   list, upload
/// /media/{id}                                              get, delete
/// ```
///
/// Every route requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/media", media::router())
}

/// Fallback for methods a resource does not support: 405 with the exact
/// list of supported methods.
pub(crate) fn not_allowed(
    allowed: &'static [&'static str],
) -> impl FnOnce() -> Ready<AppError> + Clone + Send + Sync + 'static {
    move || ready(AppError::MethodNotAllowed { allowed })
}
