//! Handlers for the `/limpezas` cleaning history.
//!
//! Admins see every record; `zeladoria` operators only their own.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use zeladoria_core::error::CoreError;
use zeladoria_core::types::{DbId, Timestamp};
use zeladoria_db::models::cleaning_record::{CleaningRecordFilter, CleaningRecordView};
use zeladoria_db::repositories::CleaningRecordRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireCleaningHistory;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /limpezas`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub sala_uuid: Option<Uuid>,
    pub sala_nome: Option<String>,
    pub funcionario_username: Option<String>,
    pub finalizada_apos: Option<Timestamp>,
    pub finalizada_antes: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/limpezas
pub async fn list_history(
    State(state): State<AppState>,
    RequireCleaningHistory(user): RequireCleaningHistory,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<CleaningRecordView>>>> {
    let filter = CleaningRecordFilter {
        operator_id: (!user.is_admin()).then_some(user.user_id),
        room_uuid: params.sala_uuid,
        room_name: params.sala_nome.filter(|s| !s.trim().is_empty()),
        operator_username: params.funcionario_username.filter(|s| !s.trim().is_empty()),
        finished_after: params.finalizada_apos,
        finished_before: params.finalizada_antes,
    };

    let page = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    let data =
        CleaningRecordRepo::list_views(&state.pool, &filter, page.limit(), page.offset()).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/limpezas/{id}
pub async fn get_history_entry(
    State(state): State<AppState>,
    RequireCleaningHistory(user): RequireCleaningHistory,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CleaningRecordView>>> {
    let data = CleaningRecordRepo::find_view_by_id(&state.pool, id)
        .await?
        .filter(|r| user.is_admin() || r.operator_id == Some(user.user_id))
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CleaningRecord",
            id,
        }))?;
    Ok(Json(DataResponse { data }))
}
