//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role is not
//! allowed. Cleaning and dirty-report actions exclude admins.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use zeladoria_core::error::CoreError;
use zeladoria_core::roles::{ROLE_ADMIN, ROLE_SOLICITANTE, ROLE_ZELADORIA};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Extract the user and reject with 403 unless their role is in `allowed`.
async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[&str],
    message: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed.contains(&user.role.as_str()) {
        return Err(AppError::Core(CoreError::Forbidden(message.into())));
    }
    Ok(user)
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, &[ROLE_ADMIN], "Admin role required")
            .await
            .map(RequireAdmin)
    }
}

/// Requires the `zeladoria` role (cleaning staff).
pub struct RequireZeladoria(pub AuthUser);

impl FromRequestParts<AppState> for RequireZeladoria {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, &[ROLE_ZELADORIA], "Zeladoria role required")
            .await
            .map(RequireZeladoria)
    }
}

/// Requires the `solicitante` role (service requesters).
pub struct RequireSolicitante(pub AuthUser);

impl FromRequestParts<AppState> for RequireSolicitante {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, &[ROLE_SOLICITANTE], "Solicitante role required")
            .await
            .map(RequireSolicitante)
    }
}

/// Requires `admin` or `zeladoria`. Used by the cleaning history endpoints.
pub struct RequireCleaningHistory(pub AuthUser);

impl FromRequestParts<AppState> for RequireCleaningHistory {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(
            parts,
            state,
            &[ROLE_ADMIN, ROLE_ZELADORIA],
            "Admin or Zeladoria role required",
        )
        .await
        .map(RequireCleaningHistory)
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use in
/// route definitions where the intent "this route requires authentication"
/// should be self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
