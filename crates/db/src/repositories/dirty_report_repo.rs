//! Repository for the append-only `dirty_reports` table.

use sqlx::PgPool;
use zeladoria_core::types::DbId;

use crate::models::dirty_report::DirtyReport;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_id, reporter_id, reported_at, notes";

/// Provides insert and lookup for dirty reports. There is no update or delete.
pub struct DirtyReportRepo;

impl DirtyReportRepo {
    /// File a dirty report (`reported_at = NOW()`).
    pub async fn create(
        pool: &PgPool,
        room_id: DbId,
        reporter_id: DbId,
        notes: Option<&str>,
    ) -> Result<DirtyReport, sqlx::Error> {
        let query = format!(
            "INSERT INTO dirty_reports (room_id, reporter_id, notes)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DirtyReport>(&query)
            .bind(room_id)
            .bind(reporter_id)
            .bind(notes)
            .fetch_one(pool)
            .await
    }

    /// List a room's reports, newest first.
    pub async fn list_for_room(pool: &PgPool, room_id: DbId) -> Result<Vec<DirtyReport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dirty_reports
             WHERE room_id = $1
             ORDER BY reported_at DESC, id DESC"
        );
        sqlx::query_as::<_, DirtyReport>(&query)
            .bind(room_id)
            .fetch_all(pool)
            .await
    }
}
