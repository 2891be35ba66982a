//! Cleaning photo model.

use serde::Serialize;
use sqlx::FromRow;
use zeladoria_core::types::{DbId, Timestamp};

/// A row from `cleaning_photos` joined with the owning record's operator.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CleaningPhoto {
    pub id: DbId,
    pub cleaning_record_id: DbId,
    /// Path relative to the media root.
    pub image_path: String,
    pub captured_at: Timestamp,
    /// Operator of the owning cleaning record.
    pub operator_id: Option<DbId>,
}
