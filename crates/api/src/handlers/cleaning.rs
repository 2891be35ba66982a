//! Handlers for the cleaning workflow actions on a room.
//!
//! Starting and finishing are reserved to the `zeladoria` role; reporting a
//! room as dirty to the `solicitante` role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeladoria_core::types::{DbId, Timestamp};
use zeladoria_db::models::cleaning_record::{CleaningRecord, CleaningRecordView};
use zeladoria_db::repositories::CleaningRecordRepo;

use crate::cleaning::controller;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireSolicitante, RequireZeladoria};
use crate::notifications::NotificationDispatcher;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body accepted by finish and dirty-report actions.
#[derive(Debug, Default, Deserialize)]
pub struct NotesRequest {
    pub observacoes: Option<String>,
}

/// Acknowledgement returned after a dirty report.
#[derive(Debug, Serialize)]
pub struct DirtyReportResponse {
    pub id: DbId,
    pub room_uuid: Uuid,
    pub reported_at: Timestamp,
    pub notes: Option<String>,
    pub message: &'static str,
}

async fn load_view(state: &AppState, record: &CleaningRecord) -> AppResult<CleaningRecordView> {
    CleaningRecordRepo::find_view_by_id(&state.pool, record.id)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Cleaning record {} vanished", record.id)))
}

/// POST /api/v1/salas/{uuid}/iniciar_limpeza
pub async fn start_cleaning(
    State(state): State<AppState>,
    RequireZeladoria(user): RequireZeladoria,
    Path(uuid): Path<Uuid>,
) -> AppResult<(StatusCode, Json<DataResponse<CleaningRecordView>>)> {
    let record = controller::start_cleaning(&state.pool, uuid, user.user_id).await?;
    let data = load_view(&state, &record).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// POST /api/v1/salas/{uuid}/concluir_limpeza
///
/// The body is optional; `observacoes` overwrites the record's notes when present.
pub async fn finish_cleaning(
    State(state): State<AppState>,
    RequireZeladoria(user): RequireZeladoria,
    Path(uuid): Path<Uuid>,
    body: Option<Json<NotesRequest>>,
) -> AppResult<Json<DataResponse<CleaningRecordView>>> {
    let Json(input) = body.unwrap_or_default();
    let record = controller::finish_cleaning(
        &state.pool,
        uuid,
        user.user_id,
        input.observacoes.as_deref(),
    )
    .await?;
    let data = load_view(&state, &record).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/salas/{uuid}/marcar_como_suja
pub async fn report_dirty(
    State(state): State<AppState>,
    RequireSolicitante(user): RequireSolicitante,
    Path(uuid): Path<Uuid>,
    body: Option<Json<NotesRequest>>,
) -> AppResult<(StatusCode, Json<DataResponse<DirtyReportResponse>>)> {
    let Json(input) = body.unwrap_or_default();
    let dispatcher = NotificationDispatcher::new(state.pool.clone());

    let report = controller::report_dirty(
        &state.pool,
        &dispatcher,
        uuid,
        user.user_id,
        input.observacoes.as_deref(),
    )
    .await?;

    let data = DirtyReportResponse {
        id: report.id,
        room_uuid: uuid,
        reported_at: report.reported_at,
        notes: report.notes,
        message: "Relatório de sala suja enviado com sucesso.",
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}
