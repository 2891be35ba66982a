//! Route definitions for the `/auth` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// Profile uploads are capped at `max_upload_bytes`.
///
/// ```text
/// POST /login            -> login
/// GET  /me               -> me (requires auth)
/// POST /change-password  -> change_password (requires auth)
/// GET  /profile          -> get_profile (requires auth)
/// PUT  /profile          -> update_profile (requires auth, multipart)
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/change-password", post(auth::change_password))
        .route(
            "/profile",
            get(auth::get_profile)
                .put(auth::update_profile)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
