//! Route definitions for the `/limpezas` cleaning history.

use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// Routes mounted at `/limpezas`. Admin and zeladoria only.
///
/// ```text
/// GET /        -> list_history
/// GET /{id}    -> get_history_entry
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(history::list_history))
        .route("/{id}", get(history::get_history_entry))
}
