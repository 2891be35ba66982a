//! Room cleaning status resolution.
//!
//! A room's status is never stored. It is derived on every read from three
//! facts about the room (is a cleaning open, when did the last cleaning
//! finish, when was the last dirty report filed) plus the room's validity
//! window. Keeping this pure lets the list endpoint, the detail endpoint and
//! the expiry job agree on the same answer.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Seconds in one hour, used for the validity window arithmetic.
const SECS_PER_HOUR: i64 = 3600;

/// The four mutually-exclusive cleanliness states a room can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CleaningStatus {
    #[serde(rename = "Limpa")]
    Clean,
    #[serde(rename = "Suja")]
    Dirty,
    #[serde(rename = "Em Limpeza")]
    InCleaning,
    #[serde(rename = "Limpeza Pendente")]
    CleaningPending,
}

impl CleaningStatus {
    pub const ALL: [CleaningStatus; 4] = [
        Self::Clean,
        Self::Dirty,
        Self::InCleaning,
        Self::CleaningPending,
    ];

    /// Wire label, as shown to API consumers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "Limpa",
            Self::Dirty => "Suja",
            Self::InCleaning => "Em Limpeza",
            Self::CleaningPending => "Limpeza Pendente",
        }
    }

    /// Parse a `status_limpeza` filter value. Matching is case-insensitive.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid status_limpeza '{wanted}'. Must be one of: Limpa, Suja, Em Limpeza, Limpeza Pendente"
                ))
            })
    }
}

impl std::fmt::Display for CleaningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The facts the resolver needs about a single room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInputs {
    /// True if any cleaning record for the room has no `finished_at`.
    pub has_open_cleaning: bool,
    /// Maximum `finished_at` among the room's finished cleaning records.
    pub last_finished_at: Option<Timestamp>,
    /// Maximum `reported_at` among the room's dirty reports.
    pub last_dirty_reported_at: Option<Timestamp>,
    /// The room's `cleaning_validity_hours`.
    pub validity_hours: i32,
}

/// Length of a room's cleanliness validity window.
pub fn validity_window(validity_hours: i32) -> chrono::Duration {
    chrono::Duration::seconds(i64::from(validity_hours) * SECS_PER_HOUR)
}

/// True if a dirty report post-dates the last finished cleaning.
///
/// Equal timestamps are not dirty.
pub fn is_dirtied_after_cleaning(
    last_finished_at: Option<Timestamp>,
    last_dirty_reported_at: Option<Timestamp>,
) -> bool {
    match (last_dirty_reported_at, last_finished_at) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(reported), Some(finished)) => reported > finished,
    }
}

/// True if a cleaning that finished at `finished_at` is still valid at `now`.
pub fn is_within_validity(finished_at: Timestamp, validity_hours: i32, now: Timestamp) -> bool {
    now - finished_at < validity_window(validity_hours)
}

/// Resolve a room's status. First match wins:
///
/// 1. an open cleaning record -> [`CleaningStatus::InCleaning`]
/// 2. a dirty report newer than the last finished cleaning -> [`CleaningStatus::Dirty`]
/// 3. a finished cleaning inside the validity window -> [`CleaningStatus::Clean`]
/// 4. anything else -> [`CleaningStatus::CleaningPending`]
pub fn resolve(inputs: &StatusInputs, now: Timestamp) -> CleaningStatus {
    if inputs.has_open_cleaning {
        return CleaningStatus::InCleaning;
    }

    if is_dirtied_after_cleaning(inputs.last_finished_at, inputs.last_dirty_reported_at) {
        return CleaningStatus::Dirty;
    }

    match inputs.last_finished_at {
        Some(finished_at) if is_within_validity(finished_at, inputs.validity_hours, now) => {
            CleaningStatus::Clean
        }
        _ => CleaningStatus::CleaningPending,
    }
}
