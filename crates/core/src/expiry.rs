//! Rule for the periodic "cleaning expired" notification.

use crate::cleaning_status::{is_dirtied_after_cleaning, is_within_validity, StatusInputs};
use crate::types::Timestamp;

/// Decide whether an active room needs a "cleaning pending" notification.
///
/// A room qualifies when its last finished cleaning has left the validity
/// window, no dirty report arrived after that cleaning, no cleaning is open
/// right now, and that cleaning has not been notified yet. `notified_for` is
/// the room's `pending_notified_for` marker: the `finished_at` of the last
/// cleaning whose expiry was notified.
pub fn needs_pending_notification(
    facts: &StatusInputs,
    notified_for: Option<Timestamp>,
    now: Timestamp,
) -> bool {
    if facts.has_open_cleaning {
        return false;
    }

    let Some(finished_at) = facts.last_finished_at else {
        return false;
    };

    if is_within_validity(finished_at, facts.validity_hours, now) {
        return false;
    }

    if is_dirtied_after_cleaning(facts.last_finished_at, facts.last_dirty_reported_at) {
        return false;
    }

    match notified_for {
        Some(covered) => covered < finished_at,
        None => true,
    }
}
