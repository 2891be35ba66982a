//! Handlers for the `/fotos_limpeza` resource.
//!
//! Uploads come from the `zeladoria` operator of an open cleaning. Reads and
//! deletes are scoped by role: admins see every photo, `zeladoria` operators
//! see photos of their own cleanings, everyone else sees nothing.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use zeladoria_core::error::CoreError;
use zeladoria_core::types::{DbId, Timestamp};
use zeladoria_db::models::cleaning_photo::CleaningPhoto;
use zeladoria_db::repositories::CleaningPhotoRepo;

use crate::cleaning::controller;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireZeladoria;
use crate::response::DataResponse;
use crate::state::AppState;

/// URL prefix under which the media root is served.
pub const MEDIA_URL_PREFIX: &str = "/media";

/// Multipart field carrying the cleaning record ID.
const FIELD_RECORD: &str = "registro_limpeza";
/// Multipart field carrying the image bytes.
const FIELD_IMAGE: &str = "imagem";

/// Query parameters for `GET /fotos_limpeza`.
#[derive(Debug, Default, Deserialize)]
pub struct PhotoListQuery {
    pub registro_limpeza: Option<DbId>,
}

/// API view of a cleaning photo.
#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub id: DbId,
    pub cleaning_record_id: DbId,
    pub image_url: String,
    pub captured_at: Timestamp,
}

impl From<CleaningPhoto> for PhotoResponse {
    fn from(photo: CleaningPhoto) -> Self {
        Self {
            id: photo.id,
            cleaning_record_id: photo.cleaning_record_id,
            image_url: format!("{MEDIA_URL_PREFIX}/{}", photo.image_path),
            captured_at: photo.captured_at,
        }
    }
}

/// Operator filter for the caller, or `None` when nothing is visible.
///
/// `Some(None)` means "no restriction" (admin).
fn visibility(user: &AuthUser) -> Option<Option<DbId>> {
    if user.is_admin() {
        Some(None)
    } else if user.is_zeladoria() {
        Some(Some(user.user_id))
    } else {
        None
    }
}

fn photo_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "CleaningPhoto",
        id,
    })
}

/// Load a photo the caller is allowed to see, or 404.
async fn find_visible(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<CleaningPhoto> {
    let scope = visibility(user).ok_or_else(|| photo_not_found(id))?;
    CleaningPhotoRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| scope.is_none() || p.operator_id == scope)
        .ok_or_else(|| photo_not_found(id))
}

/// POST /api/v1/fotos_limpeza
///
/// Multipart upload with fields `registro_limpeza` and `imagem`.
pub async fn upload_photo(
    State(state): State<AppState>,
    RequireZeladoria(user): RequireZeladoria,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<PhotoResponse>>)> {
    let mut record_id: Option<DbId> = None;
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            FIELD_RECORD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let id = text.trim().parse::<DbId>().map_err(|_| {
                    AppError::BadRequest(format!("'{FIELD_RECORD}' must be a numeric ID"))
                })?;
                record_id = Some(id);
            }
            FIELD_IMAGE => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                image = Some(data.to_vec());
            }
            _ => {}
        }
    }

    let record_id = record_id
        .ok_or_else(|| AppError::BadRequest(format!("Missing required '{FIELD_RECORD}' field")))?;
    let image =
        image.ok_or_else(|| AppError::BadRequest(format!("Missing required '{FIELD_IMAGE}' field")))?;

    let photo = controller::attach_photo(
        &state.pool,
        state.image_store.as_ref(),
        record_id,
        user.user_id,
        &image,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: photo.into(),
        }),
    ))
}

/// GET /api/v1/fotos_limpeza
pub async fn list_photos(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PhotoListQuery>,
) -> AppResult<Json<DataResponse<Vec<PhotoResponse>>>> {
    let Some(operator) = visibility(&user) else {
        return Ok(Json(DataResponse { data: Vec::new() }));
    };

    let photos = CleaningPhotoRepo::list(&state.pool, operator, params.registro_limpeza).await?;
    let data = photos.into_iter().map(PhotoResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/fotos_limpeza/{id}
pub async fn get_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PhotoResponse>>> {
    let photo = find_visible(&state, &user, id).await?;
    Ok(Json(DataResponse { data: photo.into() }))
}

/// DELETE /api/v1/fotos_limpeza/{id}
///
/// Removes the row, then the stored file. A file that cannot be removed is
/// logged and left behind.
pub async fn delete_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let photo = find_visible(&state, &user, id).await?;

    if !CleaningPhotoRepo::delete(&state.pool, photo.id).await? {
        return Err(photo_not_found(id));
    }

    if let Err(e) = state.image_store.remove(&photo.image_path).await {
        tracing::warn!(photo_id = id, path = %photo.image_path, error = %e, "Failed to remove photo file");
    }

    tracing::info!(photo_id = id, user_id = user.user_id, "Cleaning photo deleted");
    Ok(StatusCode::NO_CONTENT)
}
