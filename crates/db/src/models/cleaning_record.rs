//! Cleaning record models.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;
use zeladoria_core::types::{DbId, Timestamp};

/// A row from the `cleaning_records` table.
///
/// `finished_at = None` means the cleaning is still in progress.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CleaningRecord {
    pub id: DbId,
    pub room_id: DbId,
    pub operator_id: Option<DbId>,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub notes: Option<String>,
}

impl CleaningRecord {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// A cleaning record joined with its room and operator for API output.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CleaningRecordView {
    pub id: DbId,
    pub room_uuid: Uuid,
    pub room_name: String,
    pub operator_id: Option<DbId>,
    pub operator_username: Option<String>,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub photo_count: i64,
}

/// Filters for the cleaning history listing.
#[derive(Debug, Default, Clone)]
pub struct CleaningRecordFilter {
    /// Restrict to one operator (used for non-admin callers).
    pub operator_id: Option<DbId>,
    pub room_uuid: Option<Uuid>,
    /// Case-insensitive substring of the room name.
    pub room_name: Option<String>,
    pub operator_username: Option<String>,
    pub finished_after: Option<Timestamp>,
    pub finished_before: Option<Timestamp>,
}
