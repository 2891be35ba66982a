//! Cleaning state transitions.
//!
//! Each transition runs in one transaction that first locks the room (or the
//! cleaning record) row with `SELECT ... FOR UPDATE`. Concurrent transitions
//! on the same room therefore observe each other's writes. The partial unique
//! index on open records backs up the lock.

use sqlx::PgPool;
use uuid::Uuid;
use zeladoria_core::cleaning::{
    check_can_attach_photo, check_can_finish, check_can_report_dirty, check_can_start,
    CleaningError,
};
use zeladoria_core::error::CoreError;
use zeladoria_core::notification::dirty_report_message;
use zeladoria_core::storage::{ImageStore, CATEGORY_CLEANING_PHOTOS};
use zeladoria_core::types::DbId;
use zeladoria_db::models::cleaning_photo::CleaningPhoto;
use zeladoria_db::models::cleaning_record::CleaningRecord;
use zeladoria_db::models::dirty_report::DirtyReport;
use zeladoria_db::repositories::{
    CleaningPhotoRepo, CleaningRecordRepo, DirtyReportRepo, RoomRepo, UserRepo,
};

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::notifications::NotificationDispatcher;

/// Partial unique index allowing one open cleaning record per room.
pub const OPEN_CLEANING_INDEX: &str = "uq_cleaning_records_open_per_room";

pub(crate) fn room_not_found(uuid: Uuid) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "Room",
        key: uuid.to_string(),
    })
}

/// Normalize optional free-text notes: blank means absent.
fn clean_notes(notes: Option<&str>) -> Option<&str> {
    notes.map(str::trim).filter(|n| !n.is_empty())
}

/// Open a cleaning record for the room.
///
/// Fails with `RoomInactive` or `AlreadyInProgress`. Of two concurrent calls
/// on the same room exactly one succeeds.
pub async fn start_cleaning(
    pool: &PgPool,
    room_uuid: Uuid,
    operator_id: DbId,
) -> AppResult<CleaningRecord> {
    let mut tx = pool.begin().await?;

    let room = RoomRepo::lock_by_uuid(&mut tx, room_uuid)
        .await?
        .ok_or_else(|| room_not_found(room_uuid))?;

    let open = CleaningRecordRepo::find_open_for_room(&mut tx, room.id).await?;
    check_can_start(room.is_active, open.is_some())?;

    let record = match CleaningRecordRepo::create_open(&mut tx, room.id, operator_id).await {
        Ok(record) => record,
        Err(e) if is_unique_violation(&e, OPEN_CLEANING_INDEX) => {
            return Err(CleaningError::AlreadyInProgress.into());
        }
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;

    tracing::info!(
        room_id = room.id,
        record_id = record.id,
        operator_id,
        "Cleaning started"
    );
    Ok(record)
}

/// Attach a photo to an open cleaning record owned by `operator_id`.
///
/// The image is validated and stored before the row is inserted; if the
/// insert fails the stored file is removed again.
pub async fn attach_photo(
    pool: &PgPool,
    store: &dyn ImageStore,
    record_id: DbId,
    operator_id: DbId,
    image: &[u8],
) -> AppResult<CleaningPhoto> {
    let mut tx = pool.begin().await?;

    let record = CleaningRecordRepo::lock_by_id(&mut tx, record_id)
        .await?
        .filter(|r| r.operator_id == Some(operator_id))
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CleaningRecord",
            id: record_id,
        }))?;

    let photo_count = CleaningPhotoRepo::count_for_record(&mut tx, record.id).await?;
    check_can_attach_photo(record.is_finished(), photo_count)?;

    let stored = store.store(CATEGORY_CLEANING_PHOTOS, image).await?;

    let inserted = async {
        let id = CleaningPhotoRepo::create(&mut tx, record.id, &stored.path).await?;
        tx.commit().await?;
        Ok::<_, sqlx::Error>(id)
    }
    .await;

    let photo_id = match inserted {
        Ok(id) => id,
        Err(e) => {
            if let Err(cleanup) = store.remove(&stored.path).await {
                tracing::warn!(path = %stored.path, error = %cleanup, "Orphaned photo file");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        record_id = record.id,
        photo_id,
        count = photo_count + 1,
        width = stored.width,
        height = stored.height,
        "Cleaning photo attached"
    );

    CleaningPhotoRepo::find_by_id(pool, photo_id)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Photo {photo_id} vanished after insert")))
}

/// Close the room's open cleaning record.
///
/// Checks run in order: inactive room, no open record, no photo. On success
/// `finished_at` is set, `notes` applied when given, and the room's
/// pending-notification marker cleared.
pub async fn finish_cleaning(
    pool: &PgPool,
    room_uuid: Uuid,
    operator_id: DbId,
    notes: Option<&str>,
) -> AppResult<CleaningRecord> {
    let mut tx = pool.begin().await?;

    let room = RoomRepo::lock_by_uuid(&mut tx, room_uuid)
        .await?
        .ok_or_else(|| room_not_found(room_uuid))?;

    let open = CleaningRecordRepo::find_open_for_room(&mut tx, room.id).await?;
    let photo_count = match &open {
        Some(record) => Some(CleaningPhotoRepo::count_for_record(&mut tx, record.id).await?),
        None => None,
    };
    check_can_finish(room.is_active, photo_count)?;

    // check_can_finish rejects a missing record.
    let open = open.ok_or(CleaningError::NoOpenCleaning)?;

    let record = CleaningRecordRepo::finish(&mut tx, open.id, clean_notes(notes)).await?;
    RoomRepo::clear_pending_notified(&mut tx, room.id).await?;

    tx.commit().await?;

    tracing::info!(
        room_id = room.id,
        record_id = record.id,
        operator_id,
        "Cleaning finished"
    );
    Ok(record)
}

/// File a dirty report and notify the room's staff.
///
/// Notification failures are logged and do not fail the report.
pub async fn report_dirty(
    pool: &PgPool,
    dispatcher: &NotificationDispatcher,
    room_uuid: Uuid,
    reporter_id: DbId,
    notes: Option<&str>,
) -> AppResult<DirtyReport> {
    let room = RoomRepo::find_by_uuid(pool, room_uuid)
        .await?
        .ok_or_else(|| room_not_found(room_uuid))?;

    check_can_report_dirty(room.is_active)?;

    let notes = clean_notes(notes);
    let report = DirtyReportRepo::create(pool, room.id, reporter_id, notes).await?;

    tracing::info!(room_id = room.id, report_id = report.id, reporter_id, "Room reported dirty");

    let reporter = UserRepo::find_by_id(pool, reporter_id)
        .await
        .ok()
        .flatten()
        .map(|u| u.username)
        .unwrap_or_else(|| "um usuário".to_string());
    let message = dirty_report_message(&room.name, &reporter, notes);

    if let Err(e) = dispatcher.notify_room(&room, &message).await {
        tracing::error!(room_id = room.id, error = %e, "Failed to dispatch dirty-room notification");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_notes_are_dropped() {
        assert_eq!(clean_notes(None), None);
        assert_eq!(clean_notes(Some("   ")), None);
        assert_eq!(clean_notes(Some(" ok ")), Some("ok"));
    }
}
