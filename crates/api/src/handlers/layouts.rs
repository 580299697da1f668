//! Handlers for `/templates/{template_id}/layouts`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uptemplate_core::error::CoreError;
use uptemplate_core::types::DbId;
use uptemplate_db::models::layout::Layout;
use uptemplate_db::representation::{self, LayoutView};
use uptemplate_db::repositories::LayoutRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::templates::owned_template;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a layout of a template the caller owns.
pub(crate) async fn owned_layout(
    state: &AppState,
    auth: &AuthUser,
    template_id: DbId,
    layout_id: DbId,
) -> AppResult<Layout> {
    owned_template(state, auth, template_id).await?;
    LayoutRepo::find_in_template(&state.pool, template_id, layout_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Layout",
            id: layout_id,
        }))
}

/// GET /api/v1/templates/{template_id}/layouts
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LayoutView>>>> {
    owned_template(&state, &auth, template_id).await?;
    let views = representation::template_layouts(&state.pool, template_id).await?;
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/templates/{template_id}/layouts
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<LayoutView>>)> {
    owned_template(&state, &auth, template_id).await?;
    let layout = LayoutRepo::create(&state.pool, template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: template_id,
        }))?;

    tracing::info!(layout_id = layout.id, template_id, "Layout created");

    let view = LayoutView {
        layout,
        shapes: Vec::new(),
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/templates/{template_id}/layouts/{layout_id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((template_id, layout_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<LayoutView>>> {
    let layout = owned_layout(&state, &auth, template_id, layout_id).await?;
    let view = representation::layout_view(&state.pool, layout).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/templates/{template_id}/layouts/{layout_id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((template_id, layout_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_layout(&state, &auth, template_id, layout_id).await?;

    if LayoutRepo::delete(&state.pool, layout_id).await? {
        tracing::info!(layout_id, template_id, "Layout deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Layout",
            id: layout_id,
        }))
    }
}
