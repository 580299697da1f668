//! Handlers for `/templates/{template_id}/layouts/{layout_id}/shapes`.
//!
//! Request bodies use the wire format: creation takes `{ type, config }`,
//! updates take a flat camelCase partial map. Responses are the outward
//! shape representation `{ id, type, config }`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};
use uptemplate_core::codec::{decode_create, decode_update, CreateShapeRequest, ShapeRepresentation};
use uptemplate_core::error::CoreError;
use uptemplate_core::shape::MEDIA_CONTENT_FIELD;
use uptemplate_core::types::DbId;
use uptemplate_db::models::shape::Shape;
use uptemplate_db::representation::{self, represent};
use uptemplate_db::repositories::{MediaContentRepo, ShapeRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::layouts::owned_layout;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a shape of a layout of a template the caller owns.
async fn owned_shape(
    state: &AppState,
    auth: &AuthUser,
    (template_id, layout_id, shape_id): (DbId, DbId, DbId),
) -> AppResult<Shape> {
    owned_layout(state, auth, template_id, layout_id).await?;
    ShapeRepo::find_in_layout(&state.pool, layout_id, shape_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Shape",
            id: shape_id,
        }))
}

/// An Image shape may only place media content uploaded by the caller.
async fn check_media_content(
    state: &AppState,
    auth: &AuthUser,
    media_content_id: DbId,
) -> AppResult<()> {
    match MediaContentRepo::find_by_id(&state.pool, media_content_id).await? {
        None => Err(CoreError::field(MEDIA_CONTENT_FIELD, "Media content does not exist").into()),
        Some(content) if content.owner_id != auth.user_id => Err(CoreError::field(
            MEDIA_CONTENT_FIELD,
            "Media content belongs to another user",
        )
        .into()),
        Some(_) => Ok(()),
    }
}

/// GET /api/v1/templates/{template_id}/layouts/{layout_id}/shapes
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((template_id, layout_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Vec<ShapeRepresentation>>>> {
    owned_layout(&state, &auth, template_id, layout_id).await?;
    let shapes = representation::layout_shapes(&state.pool, layout_id).await?;
    Ok(Json(DataResponse { data: shapes }))
}

/// POST /api/v1/templates/{template_id}/layouts/{layout_id}/shapes
///
/// The body is decoded and validated in full before anything is written.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((template_id, layout_id)): Path<(DbId, DbId)>,
    Json(request): Json<CreateShapeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ShapeRepresentation>>)> {
    owned_layout(&state, &auth, template_id, layout_id).await?;

    let input = decode_create(&request)?;
    if let Some(media_content_id) = input.media_content() {
        check_media_content(&state, &auth, media_content_id).await?;
    }

    let (shape, geometry) = ShapeRepo::create(&state.pool, layout_id, &input).await?;
    let repr = represent(&shape, &geometry)?;

    tracing::info!(
        shape_id = shape.id,
        layout_id,
        kind = %input.kind(),
        "Shape created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: repr })))
}

/// GET /api/v1/templates/{template_id}/layouts/{layout_id}/shapes/{shape_id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((template_id, layout_id, shape_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<DataResponse<ShapeRepresentation>>> {
    owned_layout(&state, &auth, template_id, layout_id).await?;
    let repr = representation::shape_in_layout(&state.pool, layout_id, shape_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Shape",
            id: shape_id,
        }))?;
    Ok(Json(DataResponse { data: repr }))
}

/// PUT/PATCH /api/v1/templates/{template_id}/layouts/{layout_id}/shapes/{shape_id}
///
/// Both methods are partial: fields absent from the body keep their values.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ids): Path<(DbId, DbId, DbId)>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<Json<DataResponse<ShapeRepresentation>>> {
    let shape = owned_shape(&state, &auth, ids).await?;
    let kind = shape.shape_kind()?;

    let update = decode_update(kind, shape.id, &body)?;
    if let Some(media_content_id) = update.geometry.media_content() {
        check_media_content(&state, &auth, media_content_id).await?;
    }

    let (shape, geometry) = ShapeRepo::update(&state.pool, shape.id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Shape",
            id: shape.id,
        }))?;
    let repr = represent(&shape, &geometry)?;

    tracing::info!(shape_id = shape.id, kind = %kind, "Shape updated");

    Ok(Json(DataResponse { data: repr }))
}

/// DELETE /api/v1/templates/{template_id}/layouts/{layout_id}/shapes/{shape_id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ids): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let shape = owned_shape(&state, &auth, ids).await?;

    if ShapeRepo::delete(&state.pool, shape.id).await? {
        tracing::info!(shape_id = shape.id, layout_id = shape.layout_id, "Shape deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Shape",
            id: shape.id,
        }))
    }
}
