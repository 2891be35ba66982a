//! Room notification dispatcher.

use sqlx::PgPool;
use zeladoria_core::notification::room_link;
use zeladoria_core::roles::ROLE_ZELADORIA;
use zeladoria_core::types::DbId;
use zeladoria_db::models::room::Room;
use zeladoria_db::repositories::{NotificationRepo, RoomRepo, UserRepo};

/// Delivers room notifications as in-app `notifications` rows.
///
/// Recipients are the room's active responsible operators. A room without any
/// falls back to every active user holding the `zeladoria` role.
#[derive(Clone)]
pub struct NotificationDispatcher {
    pool: PgPool,
}

impl NotificationDispatcher {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve who should be told about `room`.
    pub async fn recipients(&self, room: &Room) -> Result<Vec<DbId>, sqlx::Error> {
        let responsibles = RoomRepo::active_responsible_ids(&self.pool, room.id).await?;
        if !responsibles.is_empty() {
            return Ok(responsibles);
        }
        UserRepo::active_ids_with_role(&self.pool, ROLE_ZELADORIA).await
    }

    /// Send `message` about `room` to its recipients.
    ///
    /// Returns the number of notifications created.
    pub async fn notify_room(&self, room: &Room, message: &str) -> Result<u64, sqlx::Error> {
        let recipients = self.recipients(room).await?;
        if recipients.is_empty() {
            tracing::warn!(room_id = room.id, "No recipients for room notification");
            return Ok(0);
        }

        let link = room_link(room.uuid);
        let created =
            NotificationRepo::create_for_users(&self.pool, &recipients, message, Some(&link))
                .await?;

        tracing::debug!(room_id = room.id, recipients = created, "Room notification sent");
        Ok(created)
    }
}
