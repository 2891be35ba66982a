//! Handlers for the `/salas` resource.
//!
//! Reads are open to any authenticated user; writes require the `admin` role.
//! Every read carries the status resolved at request time.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeladoria_core::cleaning_status::{resolve, CleaningStatus};
use zeladoria_core::error::CoreError;
use zeladoria_core::roles::ROLE_ZELADORIA;
use zeladoria_core::room::{check_can_delete, validate_fields};
use zeladoria_core::types::{DbId, Timestamp};
use zeladoria_db::models::room::{CreateRoom, Room, RoomFilter, RoomWithFacts, UpdateRoom};
use zeladoria_db::models::user::UserRef;
use zeladoria_db::repositories::{RoomRepo, UserRepo};

use crate::cleaning::controller::room_not_found;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /salas`.
#[derive(Debug, Default, Deserialize)]
pub struct RoomListQuery {
    /// One of `Limpa`, `Suja`, `Em Limpeza`, `Limpeza Pendente`.
    pub status_limpeza: Option<String>,
    pub localizacao: Option<String>,
    pub nome: Option<String>,
    pub ativa: Option<bool>,
    pub responsavel_username: Option<String>,
    pub capacidade_min: Option<i32>,
    pub capacidade_max: Option<i32>,
}

/// Request body for `POST /salas`.
#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(flatten)]
    pub room: CreateRoom,
    /// User IDs of responsible operators. Each must hold the `zeladoria` role.
    #[serde(default)]
    pub responsible_ids: Vec<DbId>,
}

/// Request body for `PUT`/`PATCH /salas/{uuid}`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoomRequest {
    #[serde(flatten)]
    pub room: UpdateRoom,
    /// When present, replaces the responsible operators.
    pub responsible_ids: Option<Vec<DbId>>,
}

/// Details of the dirty report that made a room "Suja".
#[derive(Debug, Serialize)]
pub struct DirtyDetails {
    pub reported_at: Timestamp,
    pub reported_by: Option<String>,
    pub notes: Option<String>,
}

/// A room with its resolved cleaning status.
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    #[serde(flatten)]
    pub room: Room,
    pub status_limpeza: CleaningStatus,
    pub last_cleaning_finished_at: Option<Timestamp>,
    pub last_cleaning_operator: Option<String>,
    /// Present only when `status_limpeza` is `Suja`.
    pub dirty_details: Option<DirtyDetails>,
    pub responsibles: Vec<UserRef>,
}

/// Build the API view of a room at `now`.
pub fn build_room_response(
    entry: RoomWithFacts,
    responsibles: Vec<UserRef>,
    now: Timestamp,
) -> RoomResponse {
    let status = resolve(&entry.status_inputs(), now);

    let dirty_details = match (status, entry.last_dirty_reported_at) {
        (CleaningStatus::Dirty, Some(reported_at)) => Some(DirtyDetails {
            reported_at,
            reported_by: entry.last_dirty_reporter,
            notes: entry.last_dirty_notes,
        }),
        _ => None,
    };

    RoomResponse {
        room: entry.room,
        status_limpeza: status,
        last_cleaning_finished_at: entry.last_cleaning_finished_at,
        last_cleaning_operator: entry.last_cleaning_operator,
        dirty_details,
        responsibles,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/salas
///
/// List rooms with resolved status. `status_limpeza` is applied after
/// resolution; the other filters run in SQL.
pub async fn list_rooms(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<RoomListQuery>,
) -> AppResult<Json<DataResponse<Vec<RoomResponse>>>> {
    let wanted = params
        .status_limpeza
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(CleaningStatus::parse)
        .transpose()?;

    let filter = RoomFilter {
        location: params.localizacao,
        name: params.nome,
        is_active: params.ativa,
        responsible_username: params.responsavel_username,
        min_capacity: params.capacidade_min,
        max_capacity: params.capacidade_max,
    };

    let rooms = RoomRepo::list_with_facts(&state.pool, &filter).await?;

    let room_ids: Vec<DbId> = rooms.iter().map(|r| r.room.id).collect();
    let mut responsibles: HashMap<DbId, Vec<UserRef>> = HashMap::new();
    for r in RoomRepo::list_responsibles(&state.pool, &room_ids).await? {
        responsibles.entry(r.room_id).or_default().push(UserRef {
            id: r.user_id,
            username: r.username,
        });
    }

    let now = Utc::now();
    let data: Vec<RoomResponse> = rooms
        .into_iter()
        .map(|entry| {
            let owners = responsibles.remove(&entry.room.id).unwrap_or_default();
            build_room_response(entry, owners, now)
        })
        .filter(|r| wanted.is_none_or(|w| r.status_limpeza == w))
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/salas/{uuid}
pub async fn get_room(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(uuid): Path<Uuid>,
) -> AppResult<Json<DataResponse<RoomResponse>>> {
    let data = load_room_response(&state, uuid).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/salas
///
/// Create a room (admin only). Returns 201 with the room and its status.
pub async fn create_room(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RoomResponse>>)> {
    let room = &input.room;
    validate_fields(
        Some(&room.name),
        Some(&room.location),
        Some(room.capacity),
        room.cleaning_validity_hours,
    )?;
    check_responsibles(&state, &input.responsible_ids).await?;

    let mut tx = state.pool.begin().await?;
    let created = RoomRepo::create(&mut tx, room).await?;
    RoomRepo::set_responsibles(&mut tx, created.id, &input.responsible_ids).await?;
    tx.commit().await?;

    tracing::info!(room_id = created.id, uuid = %created.uuid, admin_id = admin.user_id, "Room created");

    let data = load_room_response(&state, created.uuid).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// PUT|PATCH /api/v1/salas/{uuid}
///
/// Partial update (admin only): absent fields keep their current value.
pub async fn update_room(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(uuid): Path<Uuid>,
    Json(input): Json<UpdateRoomRequest>,
) -> AppResult<Json<DataResponse<RoomResponse>>> {
    let room = &input.room;
    validate_fields(
        room.name.as_deref(),
        room.location.as_deref(),
        room.capacity,
        room.cleaning_validity_hours,
    )?;
    if let Some(ids) = &input.responsible_ids {
        check_responsibles(&state, ids).await?;
    }

    let mut tx = state.pool.begin().await?;
    let updated = RoomRepo::update(&mut tx, uuid, room)
        .await?
        .ok_or_else(|| room_not_found(uuid))?;
    if let Some(ids) = &input.responsible_ids {
        RoomRepo::set_responsibles(&mut tx, updated.id, ids).await?;
    }
    tx.commit().await?;

    tracing::info!(room_id = updated.id, admin_id = admin.user_id, "Room updated");

    let data = load_room_response(&state, uuid).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/salas/{uuid}
///
/// Delete a deactivated room (admin only). Active rooms are rejected with 400.
/// The inactive check is repeated inside the `DELETE`, so a room reactivated
/// in between is rejected too.
pub async fn delete_room(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(uuid): Path<Uuid>,
) -> AppResult<StatusCode> {
    let room = RoomRepo::find_by_uuid(&state.pool, uuid)
        .await?
        .ok_or_else(|| room_not_found(uuid))?;

    check_can_delete(room.is_active)?;

    if !RoomRepo::delete_inactive(&state.pool, room.id).await? {
        let current = RoomRepo::find_by_id(&state.pool, room.id)
            .await?
            .ok_or_else(|| room_not_found(uuid))?;
        check_can_delete(current.is_active)?;
        return Err(room_not_found(uuid));
    }

    tracing::info!(room_id = room.id, admin_id = admin.user_id, "Room deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load one room with facts and responsibles, resolved at the current time.
async fn load_room_response(state: &AppState, uuid: Uuid) -> AppResult<RoomResponse> {
    let entry = RoomRepo::find_with_facts(&state.pool, uuid)
        .await?
        .ok_or_else(|| room_not_found(uuid))?;

    let responsibles = RoomRepo::list_responsibles(&state.pool, &[entry.room.id])
        .await?
        .into_iter()
        .map(|r| UserRef {
            id: r.user_id,
            username: r.username,
        })
        .collect();

    Ok(build_room_response(entry, responsibles, Utc::now()))
}

/// Every responsible operator must exist and hold the `zeladoria` role.
async fn check_responsibles(state: &AppState, ids: &[DbId]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let found = UserRepo::filter_by_role(&state.pool, &unique, ROLE_ZELADORIA).await?;
    if found.len() != unique.len() {
        let missing: Vec<DbId> = unique
            .into_iter()
            .filter(|id| !found.iter().any(|u| u.id == *id))
            .collect();
        return Err(AppError::Core(CoreError::Validation(format!(
            "Responsible users must hold the '{ROLE_ZELADORIA}' role: {missing:?}"
        ))));
    }
    Ok(())
}
