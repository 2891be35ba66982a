//! Repository for the `cleaning_photos` table.

use sqlx::{PgPool, Postgres, Transaction};
use zeladoria_core::types::DbId;

use crate::models::cleaning_photo::CleaningPhoto;

/// Photo columns plus the owning record's operator.
const SELECT: &str = "SELECT p.id, p.cleaning_record_id, p.image_path, p.captured_at, cr.operator_id
     FROM cleaning_photos p
     JOIN cleaning_records cr ON cr.id = p.cleaning_record_id";

/// Provides operations for cleaning photos.
pub struct CleaningPhotoRepo;

impl CleaningPhotoRepo {
    /// Count photos attached to a record.
    pub async fn count_for_record(
        tx: &mut Transaction<'_, Postgres>,
        cleaning_record_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM cleaning_photos WHERE cleaning_record_id = $1")
            .bind(cleaning_record_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Attach a photo (`captured_at = NOW()`), returning the new photo's ID.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        cleaning_record_id: DbId,
        image_path: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO cleaning_photos (cleaning_record_id, image_path)
             VALUES ($1, $2)
             RETURNING id",
        )
        .bind(cleaning_record_id)
        .bind(image_path)
        .fetch_one(&mut **tx)
        .await
    }

    /// Find a photo by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CleaningPhoto>, sqlx::Error> {
        let query = format!("{SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, CleaningPhoto>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List photos, newest first. `operator_id` restricts to one operator's records.
    pub async fn list(
        pool: &PgPool,
        operator_id: Option<DbId>,
        cleaning_record_id: Option<DbId>,
    ) -> Result<Vec<CleaningPhoto>, sqlx::Error> {
        let query = format!(
            "{SELECT}
             WHERE ($1::BIGINT IS NULL OR cr.operator_id = $1)
               AND ($2::BIGINT IS NULL OR p.cleaning_record_id = $2)
             ORDER BY p.captured_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, CleaningPhoto>(&query)
            .bind(operator_id)
            .bind(cleaning_record_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a photo row. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cleaning_photos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
