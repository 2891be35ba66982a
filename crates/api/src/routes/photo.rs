//! Route definitions for the `/fotos_limpeza` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::photo;
use crate::state::AppState;

/// Routes mounted at `/fotos_limpeza`.
///
/// Request bodies are capped at `max_upload_bytes`.
///
/// ```text
/// GET    /        -> list_photos
/// POST   /        -> upload_photo (zeladoria, multipart)
/// GET    /{id}    -> get_photo
/// DELETE /{id}    -> delete_photo
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(photo::list_photos).post(photo::upload_photo))
        .route("/{id}", get(photo::get_photo).delete(photo::delete_photo))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
