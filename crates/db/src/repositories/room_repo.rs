//! Repository for the `rooms` and `room_responsibles` tables.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use zeladoria_core::types::{DbId, Timestamp};

use crate::models::room::{CreateRoom, Room, RoomFilter, RoomResponsible, RoomWithFacts, UpdateRoom};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, uuid, name, capacity, location, description, instructions, \
                       is_active, cleaning_validity_hours, pending_notified_for, created_at, updated_at";

/// Same columns qualified with the `r` alias used by the facts query.
const R_COLUMNS: &str = "r.id, r.uuid, r.name, r.capacity, r.location, r.description, \
                         r.instructions, r.is_active, r.cleaning_validity_hours, \
                         r.pending_notified_for, r.created_at, r.updated_at";

/// Select rooms together with the status facts.
///
/// Latest finished cleaning and latest dirty report come from LATERAL
/// sub-selects so one round trip serves the whole list. Callers append the
/// `WHERE` clause.
fn facts_query() -> String {
    format!(
        "SELECT {R_COLUMNS},
            EXISTS (
                SELECT 1 FROM cleaning_records oc
                WHERE oc.room_id = r.id AND oc.finished_at IS NULL
            ) AS has_open_cleaning,
            lf.finished_at AS last_cleaning_finished_at,
            lf.operator_username AS last_cleaning_operator,
            ld.reported_at AS last_dirty_reported_at,
            ld.reporter_username AS last_dirty_reporter,
            ld.notes AS last_dirty_notes
         FROM rooms r
         LEFT JOIN LATERAL (
            SELECT cr.finished_at, u.username AS operator_username
            FROM cleaning_records cr
            LEFT JOIN users u ON u.id = cr.operator_id
            WHERE cr.room_id = r.id AND cr.finished_at IS NOT NULL
            ORDER BY cr.finished_at DESC, cr.id DESC
            LIMIT 1
         ) lf ON true
         LEFT JOIN LATERAL (
            SELECT d.reported_at, d.notes, u.username AS reporter_username
            FROM dirty_reports d
            LEFT JOIN users u ON u.id = d.reporter_id
            WHERE d.room_id = r.id
            ORDER BY d.reported_at DESC, d.id DESC
            LIMIT 1
         ) ld ON true"
    )
}

/// Provides CRUD and locking operations for rooms.
pub struct RoomRepo;

impl RoomRepo {
    /// Insert a new room inside a transaction, returning the created row.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateRoom,
    ) -> Result<Room, sqlx::Error> {
        let query = format!(
            "INSERT INTO rooms (name, capacity, location, description, instructions,
                                is_active, cleaning_validity_hours)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, true), COALESCE($7, 4))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(&input.name)
            .bind(input.capacity)
            .bind(&input.location)
            .bind(&input.description)
            .bind(&input.instructions)
            .bind(input.is_active)
            .bind(input.cleaning_validity_hours)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a room by its external UUID.
    pub async fn find_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE uuid = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Find a room by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock a room row for the rest of the transaction (`SELECT ... FOR UPDATE`).
    ///
    /// Every cleaning state transition on a room goes through this lock, so
    /// two concurrent transitions on the same room are serialized.
    pub async fn lock_by_uuid(
        tx: &mut Transaction<'_, Postgres>,
        uuid: Uuid,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE uuid = $1 FOR UPDATE");
        sqlx::query_as::<_, Room>(&query)
            .bind(uuid)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Load one room with its status facts.
    pub async fn find_with_facts(
        pool: &PgPool,
        uuid: Uuid,
    ) -> Result<Option<RoomWithFacts>, sqlx::Error> {
        let query = format!("{} WHERE r.uuid = $1", facts_query());
        sqlx::query_as::<_, RoomWithFacts>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// List rooms with their status facts, applying the SQL-side filters.
    ///
    /// Filtering by resolved status happens in the caller, since status
    /// depends on the current time.
    pub async fn list_with_facts(
        pool: &PgPool,
        filter: &RoomFilter,
    ) -> Result<Vec<RoomWithFacts>, sqlx::Error> {
        let query = format!(
            "{} WHERE ($1::TEXT IS NULL OR r.location ILIKE '%' || $1 || '%')
                AND ($2::TEXT IS NULL OR r.name ILIKE '%' || $2 || '%')
                AND ($3::BOOLEAN IS NULL OR r.is_active = $3)
                AND ($4::TEXT IS NULL OR EXISTS (
                    SELECT 1 FROM room_responsibles rr
                    JOIN users ru ON ru.id = rr.user_id
                    WHERE rr.room_id = r.id AND ru.username ILIKE '%' || $4 || '%'
                ))
                AND ($5::INTEGER IS NULL OR r.capacity >= $5)
                AND ($6::INTEGER IS NULL OR r.capacity <= $6)
             ORDER BY r.name",
            facts_query()
        );
        sqlx::query_as::<_, RoomWithFacts>(&query)
            .bind(&filter.location)
            .bind(&filter.name)
            .bind(filter.is_active)
            .bind(&filter.responsible_username)
            .bind(filter.min_capacity)
            .bind(filter.max_capacity)
            .fetch_all(pool)
            .await
    }

    /// List every active room with its status facts (expiry check input).
    pub async fn list_active_with_facts(pool: &PgPool) -> Result<Vec<RoomWithFacts>, sqlx::Error> {
        let filter = RoomFilter {
            is_active: Some(true),
            ..RoomFilter::default()
        };
        Self::list_with_facts(pool, &filter).await
    }

    /// Update a room inside a transaction. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `uuid` exists.
    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        uuid: Uuid,
        input: &UpdateRoom,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!(
            "UPDATE rooms SET
                name = COALESCE($2, name),
                capacity = COALESCE($3, capacity),
                location = COALESCE($4, location),
                description = COALESCE($5, description),
                instructions = COALESCE($6, instructions),
                is_active = COALESCE($7, is_active),
                cleaning_validity_hours = COALESCE($8, cleaning_validity_hours)
             WHERE uuid = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(uuid)
            .bind(&input.name)
            .bind(input.capacity)
            .bind(&input.location)
            .bind(&input.description)
            .bind(&input.instructions)
            .bind(input.is_active)
            .bind(input.cleaning_validity_hours)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Hard-delete a room, but only while it is inactive. Cleaning records,
    /// photos and dirty reports cascade.
    ///
    /// Returns `false` if no inactive row with `id` exists, including when
    /// the room was reactivated after the caller last read it.
    pub async fn delete_inactive(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1 AND is_active = false")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record that the "cleaning pending" notification went out for the
    /// cleaning that finished at `covered_finished_at`.
    ///
    /// The marker stores that finish time rather than the send time, so a
    /// cleaning finished while the pass was running keeps a later
    /// `finished_at` and is still reported when it expires. The marker never
    /// moves backwards.
    pub async fn mark_pending_notified(
        pool: &PgPool,
        id: DbId,
        covered_finished_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE rooms
             SET pending_notified_for = GREATEST(COALESCE(pending_notified_for, $2), $2)
             WHERE id = $1",
        )
        .bind(id)
        .bind(covered_finished_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Clear the pending-notification marker so the next expiry is reported.
    pub async fn clear_pending_notified(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE rooms SET pending_notified_for = NULL WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Responsible operators
    // -----------------------------------------------------------------------

    /// Replace the room's responsible operators within an existing transaction.
    pub async fn set_responsibles(
        tx: &mut Transaction<'_, Postgres>,
        room_id: DbId,
        user_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM room_responsibles WHERE room_id = $1")
            .bind(room_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            "INSERT INTO room_responsibles (room_id, user_id)
             SELECT $1, uid FROM UNNEST($2::BIGINT[]) AS uid
             ON CONFLICT DO NOTHING",
        )
        .bind(room_id)
        .bind(user_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Load responsible operators for a batch of rooms.
    pub async fn list_responsibles(
        pool: &PgPool,
        room_ids: &[DbId],
    ) -> Result<Vec<RoomResponsible>, sqlx::Error> {
        sqlx::query_as::<_, RoomResponsible>(
            "SELECT rr.room_id, u.id AS user_id, u.username
             FROM room_responsibles rr
             JOIN users u ON u.id = rr.user_id
             WHERE rr.room_id = ANY($1)
             ORDER BY u.username",
        )
        .bind(room_ids)
        .fetch_all(pool)
        .await
    }

    /// IDs of the active responsible operators of one room.
    pub async fn active_responsible_ids(
        pool: &PgPool,
        room_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT u.id FROM room_responsibles rr
             JOIN users u ON u.id = rr.user_id
             WHERE rr.room_id = $1 AND u.is_active = true
             ORDER BY u.id",
        )
        .bind(room_id)
        .fetch_all(pool)
        .await
    }
}
