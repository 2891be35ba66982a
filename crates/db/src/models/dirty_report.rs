//! Dirty report model.

use serde::Serialize;
use sqlx::FromRow;
use zeladoria_core::types::{DbId, Timestamp};

/// A row from the append-only `dirty_reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DirtyReport {
    pub id: DbId,
    pub room_id: DbId,
    pub reporter_id: Option<DbId>,
    pub reported_at: Timestamp,
    pub notes: Option<String>,
}
