//! Room entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use zeladoria_core::cleaning_status::StatusInputs;
use zeladoria_core::types::{DbId, Timestamp};

/// A row from the `rooms` table.
///
/// `id` is internal; clients address rooms by `uuid`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub uuid: Uuid,
    pub name: String,
    pub capacity: i32,
    pub location: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub is_active: bool,
    pub cleaning_validity_hours: i32,
    #[serde(skip_serializing)]
    pub pending_notified_for: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A room joined with the three facts the status resolver needs, plus the
/// display details of the latest cleaning and the latest dirty report.
#[derive(Debug, Clone, FromRow)]
pub struct RoomWithFacts {
    #[sqlx(flatten)]
    pub room: Room,
    pub has_open_cleaning: bool,
    pub last_cleaning_finished_at: Option<Timestamp>,
    pub last_cleaning_operator: Option<String>,
    pub last_dirty_reported_at: Option<Timestamp>,
    pub last_dirty_reporter: Option<String>,
    pub last_dirty_notes: Option<String>,
}

impl RoomWithFacts {
    pub fn status_inputs(&self) -> StatusInputs {
        StatusInputs {
            has_open_cleaning: self.has_open_cleaning,
            last_finished_at: self.last_cleaning_finished_at,
            last_dirty_reported_at: self.last_dirty_reported_at,
            validity_hours: self.room.cleaning_validity_hours,
        }
    }
}

/// DTO for creating a new room.
#[derive(Debug, Deserialize)]
pub struct CreateRoom {
    pub name: String,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default)]
    pub location: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub is_active: Option<bool>,
    pub cleaning_validity_hours: Option<i32>,
}

/// DTO for updating an existing room. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRoom {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub is_active: Option<bool>,
    pub cleaning_validity_hours: Option<i32>,
}

/// SQL-side filters for room listing. `None` means "no filter".
#[derive(Debug, Default, Clone)]
pub struct RoomFilter {
    /// Case-insensitive substring of `location`.
    pub location: Option<String>,
    /// Case-insensitive substring of `name`.
    pub name: Option<String>,
    pub is_active: Option<bool>,
    /// Case-insensitive substring of a responsible operator's username.
    pub responsible_username: Option<String>,
    /// Inclusive lower bound on `capacity`.
    pub min_capacity: Option<i32>,
    /// Inclusive upper bound on `capacity`.
    pub max_capacity: Option<i32>,
}

/// One `(room, responsible operator)` pair, used to batch-load responsibles.
#[derive(Debug, Clone, FromRow)]
pub struct RoomResponsible {
    pub room_id: DbId,
    pub user_id: DbId,
    pub username: String,
}
