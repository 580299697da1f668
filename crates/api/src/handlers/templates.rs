//! Handlers for the `/templates` resource.
//!
//! Templates are owned by the authenticated user who created them; every
//! handler here (and the nested layout and shape handlers) resolves the
//! template through [`owned_template`] first.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uptemplate_core::error::CoreError;
use uptemplate_core::template::ensure_owner;
use uptemplate_core::types::DbId;
use uptemplate_db::models::template::{CreateTemplate, Template, UpdateTemplate};
use uptemplate_db::representation::{self, TemplateData, TemplateView};
use uptemplate_db::repositories::TemplateRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a template and check that the caller owns it.
pub(crate) async fn owned_template(
    state: &AppState,
    auth: &AuthUser,
    template_id: DbId,
) -> AppResult<Template> {
    let template = TemplateRepo::find_by_id(&state.pool, template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: template_id,
        }))?;
    ensure_owner("Template", template.owner_id, auth.user_id)?;
    Ok(template)
}

/// GET /api/v1/templates
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Template>>>> {
    let templates = TemplateRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/templates
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<Template>>)> {
    input.validate()?;
    let template = TemplateRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        template_id = template.id,
        user_id = auth.user_id,
        "Template created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/templates/{template_id}
///
/// The template row with its layouts and their shapes expanded.
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TemplateView>>> {
    let template = owned_template(&state, &auth, template_id).await?;
    let view = representation::template_view(&state.pool, template).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/templates/{template_id}/data
pub async fn get_data(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TemplateData>>> {
    let template = owned_template(&state, &auth, template_id).await?;
    let data = representation::template_data(&state.pool, template).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT/PATCH /api/v1/templates/{template_id}
///
/// Only name and canvas size are editable; any `user`/owner key in the
/// body is ignored.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<Json<DataResponse<Template>>> {
    input.validate()?;
    owned_template(&state, &auth, template_id).await?;

    let template = TemplateRepo::update(&state.pool, template_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: template_id,
        }))?;

    tracing::info!(template_id, user_id = auth.user_id, "Template updated");

    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/templates/{template_id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_template(&state, &auth, template_id).await?;

    if TemplateRepo::delete(&state.pool, template_id).await? {
        tracing::info!(template_id, user_id = auth.user_id, "Template deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: template_id,
        }))
    }
}
