//! Periodic "cleaning pending" check.
//!
//! Walks every active room, and for each one whose last cleaning has left the
//! validity window (and was not superseded by a dirty report or a new
//! cleaning) sends one notification per cleaning cycle. The room's
//! `pending_notified_for` marker holds the finish time of the cleaning that
//! was reported, so the same cycle is never reported twice and a later one
//! always is.

use serde::Serialize;
use sqlx::PgPool;
use zeladoria_core::expiry::needs_pending_notification;
use zeladoria_core::notification::pending_cleaning_message;
use zeladoria_core::types::Timestamp;
use zeladoria_db::repositories::RoomRepo;

use crate::notifications::NotificationDispatcher;

/// Outcome of one expiry-check pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpiryReport {
    /// Active rooms examined.
    pub rooms_checked: usize,
    /// Rooms that received a pending notification in this pass.
    pub rooms_notified: usize,
    /// Notification rows created across all rooms.
    pub notifications_sent: u64,
}

/// Run one expiry-check pass at `now`.
///
/// A failure on one room is logged and the pass continues with the next.
pub async fn run_expiry_check(
    pool: &PgPool,
    dispatcher: &NotificationDispatcher,
    now: Timestamp,
) -> Result<ExpiryReport, sqlx::Error> {
    let rooms = RoomRepo::list_active_with_facts(pool).await?;
    let mut report = ExpiryReport {
        rooms_checked: rooms.len(),
        ..ExpiryReport::default()
    };

    for entry in rooms {
        let room = &entry.room;
        if !needs_pending_notification(&entry.status_inputs(), room.pending_notified_for, now) {
            continue;
        }
        let Some(covered) = entry.last_cleaning_finished_at else {
            continue;
        };

        let message = pending_cleaning_message(&room.name);
        match dispatcher.notify_room(room, &message).await {
            Ok(sent) => {
                RoomRepo::mark_pending_notified(pool, room.id, covered).await?;
                report.rooms_notified += 1;
                report.notifications_sent += sent;
                tracing::info!(room_id = room.id, sent, "Pending cleaning notified");
            }
            Err(e) => {
                tracing::error!(room_id = room.id, error = %e, "Pending cleaning notification failed");
            }
        }
    }

    Ok(report)
}
