//! Repository for the `cleaning_records` table.

use sqlx::{PgPool, Postgres, Transaction};
use zeladoria_core::types::DbId;

use crate::models::cleaning_record::{CleaningRecord, CleaningRecordFilter, CleaningRecordView};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_id, operator_id, started_at, finished_at, notes";

/// Joined projection for history listings.
const VIEW_SELECT: &str = "SELECT cr.id, r.uuid AS room_uuid, r.name AS room_name,
        cr.operator_id, u.username AS operator_username,
        cr.started_at, cr.finished_at, cr.notes,
        (SELECT COUNT(*) FROM cleaning_photos p WHERE p.cleaning_record_id = cr.id) AS photo_count
     FROM cleaning_records cr
     JOIN rooms r ON r.id = cr.room_id
     LEFT JOIN users u ON u.id = cr.operator_id";

/// Provides workflow and history operations for cleaning records.
pub struct CleaningRecordRepo;

impl CleaningRecordRepo {
    /// Open a new cleaning record (`started_at = NOW()`, `finished_at = NULL`).
    ///
    /// Must run under the room row lock. The partial unique index
    /// `uq_cleaning_records_open_per_room` rejects a second open record.
    pub async fn create_open(
        tx: &mut Transaction<'_, Postgres>,
        room_id: DbId,
        operator_id: DbId,
    ) -> Result<CleaningRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO cleaning_records (room_id, operator_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CleaningRecord>(&query)
            .bind(room_id)
            .bind(operator_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// The room's open record, most recent by `started_at`.
    pub async fn find_open_for_room(
        tx: &mut Transaction<'_, Postgres>,
        room_id: DbId,
    ) -> Result<Option<CleaningRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cleaning_records
             WHERE room_id = $1 AND finished_at IS NULL
             ORDER BY started_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, CleaningRecord>(&query)
            .bind(room_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Lock a record row for the rest of the transaction.
    pub async fn lock_by_id(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<CleaningRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cleaning_records WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, CleaningRecord>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Close a record: set `finished_at = NOW()` and apply `notes` when given.
    pub async fn finish(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        notes: Option<&str>,
    ) -> Result<CleaningRecord, sqlx::Error> {
        let query = format!(
            "UPDATE cleaning_records SET
                finished_at = NOW(),
                notes = COALESCE($2, notes)
             WHERE id = $1 AND finished_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CleaningRecord>(&query)
            .bind(id)
            .bind(notes)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find the joined view of one record.
    pub async fn find_view_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CleaningRecordView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE cr.id = $1");
        sqlx::query_as::<_, CleaningRecordView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List cleaning history, newest first.
    pub async fn list_views(
        pool: &PgPool,
        filter: &CleaningRecordFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CleaningRecordView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT}
             WHERE ($1::BIGINT IS NULL OR cr.operator_id = $1)
               AND ($2::UUID IS NULL OR r.uuid = $2)
               AND ($3::TEXT IS NULL OR r.name ILIKE '%' || $3 || '%')
               AND ($4::TEXT IS NULL OR u.username = $4)
               AND ($5::TIMESTAMPTZ IS NULL OR cr.finished_at >= $5)
               AND ($6::TIMESTAMPTZ IS NULL OR cr.finished_at <= $6)
             ORDER BY cr.started_at DESC, cr.id DESC
             LIMIT $7 OFFSET $8"
        );
        sqlx::query_as::<_, CleaningRecordView>(&query)
            .bind(filter.operator_id)
            .bind(filter.room_uuid)
            .bind(&filter.room_name)
            .bind(&filter.operator_username)
            .bind(filter.finished_after)
            .bind(filter.finished_before)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
