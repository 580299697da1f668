//! Handlers for the `/media` resource (uploaded media contents).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use uptemplate_core::error::CoreError;
use uptemplate_core::media::MediaUploadForm;
use uptemplate_core::template::ensure_owner;
use uptemplate_core::types::DbId;
use uptemplate_db::models::media_content::{CreateMediaContent, MediaContent};
use uptemplate_db::repositories::MediaContentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn owned_media_content(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<MediaContent> {
    let content = MediaContentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MediaContent",
            id,
        }))?;
    ensure_owner("MediaContent", content.owner_id, auth.user_id)?;
    Ok(content)
}

/// GET /api/v1/media
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MediaContent>>>> {
    let contents = MediaContentRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: contents }))
}

/// POST /api/v1/media
///
/// Multipart fields: `file` (required), `originalWidth`, `originalHeight`,
/// `alt`. The file is stored first; the row is only written once the blob
/// store has accepted it, and the blob is removed again if that write fails.
pub async fn upload(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<MediaContent>>)> {
    let mut form = MediaUploadForm::default();
    let mut bytes = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                form.file_name = Some(field.file_name().unwrap_or_default().to_string());
                bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?
                    .to_vec();
                form.file_len = bytes.len();
            }
            "originalWidth" | "originalHeight" | "alt" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                match name.as_str() {
                    "originalWidth" => form.original_width = Some(value),
                    "originalHeight" => form.original_height = Some(value),
                    _ => form.alt = Some(value),
                }
            }
            _ => {
                tracing::debug!(field = %name, "Ignoring unknown multipart field");
            }
        }
    }

    let metadata = form.validate(state.config.max_upload_bytes)?;
    let reference = state.blob_store.put(&metadata.extension, &bytes).await?;

    let input = CreateMediaContent {
        content: reference,
        original_width: metadata.original_width,
        original_height: metadata.original_height,
        alt: metadata.alt,
    };
    let content = match MediaContentRepo::create(&state.pool, auth.user_id, &input).await {
        Ok(content) => content,
        Err(e) => {
            if let Err(blob_err) = state.blob_store.delete(&input.content).await {
                tracing::warn!(
                    reference = %input.content,
                    error = %blob_err,
                    "Failed to remove blob after rejected media insert"
                );
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        media_content_id = content.id,
        user_id = auth.user_id,
        file_name = %metadata.file_name,
        size = bytes.len(),
        "Media content uploaded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: content })))
}

/// GET /api/v1/media/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MediaContent>>> {
    let content = owned_media_content(&state, &auth, id).await?;
    Ok(Json(DataResponse { data: content }))
}

/// DELETE /api/v1/media/{id}
///
/// Removes the Image shapes placing this content, the row, then the blob.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_media_content(&state, &auth, id).await?;

    let deleted = MediaContentRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MediaContent",
            id,
        }))?;

    if let Err(e) = state.blob_store.delete(&deleted.content).await {
        tracing::warn!(
            media_content_id = id,
            reference = %deleted.content,
            error = %e,
            "Failed to remove blob of deleted media content"
        );
    }

    tracing::info!(media_content_id = id, user_id = auth.user_id, "Media content deleted");
    Ok(StatusCode::NO_CONTENT)
}
