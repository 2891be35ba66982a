//! Route definitions for the `/salas` resource and its workflow actions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{cleaning, room};
use crate::state::AppState;

/// Routes mounted at `/salas`.
///
/// ```text
/// GET    /                          -> list_rooms
/// POST   /                          -> create_room (admin)
/// GET    /{uuid}                    -> get_room
/// PUT    /{uuid}                    -> update_room (admin)
/// PATCH  /{uuid}                    -> update_room (admin)
/// DELETE /{uuid}                    -> delete_room (admin, inactive rooms only)
///
/// POST   /{uuid}/iniciar_limpeza    -> start_cleaning (zeladoria)
/// POST   /{uuid}/concluir_limpeza   -> finish_cleaning (zeladoria)
/// POST   /{uuid}/marcar_como_suja   -> report_dirty (solicitante)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(room::list_rooms).post(room::create_room))
        .route(
            "/{uuid}",
            get(room::get_room)
                .put(room::update_room)
                .patch(room::update_room)
                .delete(room::delete_room),
        )
        .route("/{uuid}/iniciar_limpeza", post(cleaning::start_cleaning))
        .route("/{uuid}/concluir_limpeza", post(cleaning::finish_cleaning))
        .route("/{uuid}/marcar_como_suja", post(cleaning::report_dirty))
}
