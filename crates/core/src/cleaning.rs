//! Cleaning workflow rules.
//!
//! Per room the workflow has two states: idle (no open cleaning record) and
//! in progress (exactly one record with `finished_at IS NULL`). The API layer
//! loads the facts under a row lock and asks these functions whether a
//! transition is allowed; the functions themselves never touch the database.

/// Maximum photos attached to one cleaning record.
pub const MAX_PHOTOS_PER_CLEANING: i64 = 3;

/// Default `rooms.cleaning_validity_hours`.
pub const DEFAULT_VALIDITY_HOURS: i32 = 4;

/// Business-rule rejections of the cleaning workflow.
///
/// Every variant is user-correctable and maps to a 400 response whose reason
/// string is the `Display` output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CleaningError {
    #[error("Esta sala não está ativa e não pode ser utilizada.")]
    RoomInactive,

    #[error("Esta sala já está em processo de limpeza.")]
    AlreadyInProgress,

    #[error("Nenhuma limpeza foi iniciada para esta sala.")]
    NoOpenCleaning,

    #[error("Esta limpeza já foi concluída e não aceita novas fotos.")]
    AlreadyFinished,

    #[error("Limite de 3 fotos por registro de limpeza atingido.")]
    PhotoLimitReached,

    #[error("É necessário enviar pelo menos uma foto antes de concluir a limpeza.")]
    PhotoRequired,
}

impl CleaningError {
    /// Stable machine-readable code for the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoomInactive => "ROOM_INACTIVE",
            Self::AlreadyInProgress => "CLEANING_ALREADY_IN_PROGRESS",
            Self::NoOpenCleaning => "NO_OPEN_CLEANING",
            Self::AlreadyFinished => "CLEANING_ALREADY_FINISHED",
            Self::PhotoLimitReached => "PHOTO_LIMIT_REACHED",
            Self::PhotoRequired => "PHOTO_REQUIRED",
        }
    }
}

/// Check whether a new cleaning may start.
///
/// `has_open_cleaning` must be read while holding the room row lock.
pub fn check_can_start(room_active: bool, has_open_cleaning: bool) -> Result<(), CleaningError> {
    if !room_active {
        return Err(CleaningError::RoomInactive);
    }
    if has_open_cleaning {
        return Err(CleaningError::AlreadyInProgress);
    }
    Ok(())
}

/// Check whether another photo may be attached to a record.
pub fn check_can_attach_photo(is_finished: bool, photo_count: i64) -> Result<(), CleaningError> {
    if is_finished {
        return Err(CleaningError::AlreadyFinished);
    }
    if photo_count >= MAX_PHOTOS_PER_CLEANING {
        return Err(CleaningError::PhotoLimitReached);
    }
    Ok(())
}

/// Check whether the room's open cleaning may be finished.
///
/// `open_photo_count` is `None` when the room has no open record.
/// Order of checks: inactive room, then missing record, then missing photo.
pub fn check_can_finish(
    room_active: bool,
    open_photo_count: Option<i64>,
) -> Result<(), CleaningError> {
    if !room_active {
        return Err(CleaningError::RoomInactive);
    }
    match open_photo_count {
        None => Err(CleaningError::NoOpenCleaning),
        Some(0) => Err(CleaningError::PhotoRequired),
        Some(_) => Ok(()),
    }
}

/// Check whether a dirty report may be filed.
pub fn check_can_report_dirty(room_active: bool) -> Result<(), CleaningError> {
    if room_active {
        Ok(())
    } else {
        Err(CleaningError::RoomInactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn start_requires_active_room() {
        assert_matches!(check_can_start(false, false), Err(CleaningError::RoomInactive));
        // Inactive is reported before an open cleaning.
        assert_matches!(check_can_start(false, true), Err(CleaningError::RoomInactive));
    }

    #[test]
    fn start_rejects_second_open_cleaning() {
        assert_matches!(
            check_can_start(true, true),
            Err(CleaningError::AlreadyInProgress)
        );
        assert!(check_can_start(true, false).is_ok());
    }

    #[test]
    fn photo_limit_is_three() {
        for count in 0..MAX_PHOTOS_PER_CLEANING {
            assert!(check_can_attach_photo(false, count).is_ok());
        }
        assert_matches!(
            check_can_attach_photo(false, 3),
            Err(CleaningError::PhotoLimitReached)
        );
    }

    #[test]
    fn no_photos_after_finish() {
        assert_matches!(
            check_can_attach_photo(true, 0),
            Err(CleaningError::AlreadyFinished)
        );
        assert_matches!(
            check_can_attach_photo(true, 3),
            Err(CleaningError::AlreadyFinished)
        );
    }

    #[test]
    fn finish_check_order() {
        assert_matches!(check_can_finish(false, None), Err(CleaningError::RoomInactive));
        assert_matches!(check_can_finish(true, None), Err(CleaningError::NoOpenCleaning));
        assert_matches!(check_can_finish(true, Some(0)), Err(CleaningError::PhotoRequired));
        assert!(check_can_finish(true, Some(1)).is_ok());
    }

    #[test]
    fn dirty_report_requires_active_room() {
        assert!(check_can_report_dirty(true).is_ok());
        assert_matches!(check_can_report_dirty(false), Err(CleaningError::RoomInactive));
    }

    #[test]
    fn reason_strings_carry_expected_phrases() {
        assert!(CleaningError::AlreadyInProgress
            .to_string()
            .contains("já está em processo de limpeza"));
        assert!(CleaningError::NoOpenCleaning
            .to_string()
            .contains("Nenhuma limpeza foi iniciada"));
        assert!(CleaningError::PhotoRequired
            .to_string()
            .contains("enviar pelo menos uma foto"));
        assert!(CleaningError::PhotoLimitReached
            .to_string()
            .contains("Limite de 3 fotos"));
        assert!(CleaningError::RoomInactive
            .to_string()
            .starts_with("Esta sala não está ativa"));
    }
}
