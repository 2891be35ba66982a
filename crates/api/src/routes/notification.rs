//! Route definitions for the `/notificacoes` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notificacoes`.
///
/// ```text
/// GET    /                          -> list_notifications
/// GET    /nao_lidas                 -> unread_count
/// POST   /marcar_todas_como_lidas   -> mark_all_read
/// POST   /{id}/marcar_como_lida     -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list_notifications))
        .route("/nao_lidas", get(notification::unread_count))
        .route(
            "/marcar_todas_como_lidas",
            post(notification::mark_all_read),
        )
        .route("/{id}/marcar_como_lida", post(notification::mark_read))
}
