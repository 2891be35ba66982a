//! Handlers for the `/notificacoes` resource.
//!
//! All endpoints require authentication via [`AuthUser`] and only ever touch
//! the caller's own notifications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use zeladoria_core::error::CoreError;
use zeladoria_core::types::DbId;
use zeladoria_db::models::notification::Notification;
use zeladoria_db::repositories::NotificationRepo;

use crate::cleaning::expiry::{run_expiry_check, ExpiryReport};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notifications::NotificationDispatcher;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notificacoes`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response body of `POST /notificacoes/marcar_todas_como_lidas`.
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub marked_read: u64,
}

/// Response body of `GET /notificacoes/nao_lidas`.
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// GET /api/v1/notificacoes
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let page = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    let data = NotificationRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.unread_only.unwrap_or(false),
        page.limit(),
        page.offset(),
    )
    .await?;

    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/notificacoes/{id}/marcar_como_lida
///
/// Returns 204 No Content, or 404 if the notification does not belong to
/// the caller.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let found = NotificationRepo::mark_read(&state.pool, notification_id, auth.user_id).await?;

    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notificacoes/marcar_todas_como_lidas
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkAllReadResponse>>> {
    let marked_read = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: MarkAllReadResponse { marked_read },
    }))
}

/// GET /api/v1/notificacoes/nao_lidas
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCountResponse>>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCountResponse { count },
    }))
}

/// POST /api/v1/admin/cleaning/expiry-check
///
/// Run one expiry pass immediately (admin only).
pub async fn trigger_expiry_check(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<ExpiryReport>>> {
    let dispatcher = NotificationDispatcher::new(state.pool.clone());
    let data = run_expiry_check(&state.pool, &dispatcher, Utc::now()).await?;

    tracing::info!(
        admin_id = admin.user_id,
        rooms_checked = data.rooms_checked,
        rooms_notified = data.rooms_notified,
        "Manual expiry check"
    );
    Ok(Json(DataResponse { data }))
}
