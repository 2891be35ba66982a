pub mod admin;
pub mod auth;
pub mod health;
pub mod history;
pub mod notification;
pub mod photo;
pub mod room;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         current user
/// /auth/change-password                            change own password (POST)
/// /auth/profile                                    own profile (GET, PUT multipart)
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update, deactivate
/// /admin/users/{id}/reset-password                 reset password
/// /admin/cleaning/expiry-check                     run expiry check now (POST)
///
/// /salas                                           list, create
/// /salas/{uuid}                                    get, update, delete
/// /salas/{uuid}/iniciar_limpeza                    start cleaning (POST)
/// /salas/{uuid}/concluir_limpeza                   finish cleaning (POST)
/// /salas/{uuid}/marcar_como_suja                   report dirty (POST)
///
/// /fotos_limpeza                                   list, upload (multipart)
/// /fotos_limpeza/{id}                              get, delete
///
/// /limpezas                                        cleaning history (GET)
/// /limpezas/{id}                                   history entry (GET)
///
/// /notificacoes                                    list (GET)
/// /notificacoes/nao_lidas                          unread count (GET)
/// /notificacoes/marcar_todas_como_lidas            mark all read (POST)
/// /notificacoes/{id}/marcar_como_lida              mark read (POST)
/// ```
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router(max_upload_bytes))
        .nest("/admin", admin::router())
        .nest("/salas", room::router())
        .nest("/fotos_limpeza", photo::router(max_upload_bytes))
        .nest("/limpezas", history::router())
        .nest("/notificacoes", notification::router())
}
