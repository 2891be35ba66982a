//! Room field validation.

use crate::error::CoreError;

/// Maximum length of `rooms.name` and `rooms.location`.
pub const MAX_NAME_LEN: usize = 100;

/// Validate a room name: non-blank and at most [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Room name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Room name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_location(location: &str) -> Result<(), CoreError> {
    if location.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Room location must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_capacity(capacity: i32) -> Result<(), CoreError> {
    if capacity < 0 {
        return Err(CoreError::Validation(
            "Room capacity must not be negative".into(),
        ));
    }
    Ok(())
}

/// The validity window is a whole number of hours, at least one.
pub fn validate_validity_hours(hours: i32) -> Result<(), CoreError> {
    if hours < 1 {
        return Err(CoreError::Validation(
            "cleaning_validity_hours must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Validate whichever room fields are present in a create or update payload.
pub fn validate_fields(
    name: Option<&str>,
    location: Option<&str>,
    capacity: Option<i32>,
    validity_hours: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(name) = name {
        validate_name(name)?;
    }
    if let Some(location) = location {
        validate_location(location)?;
    }
    if let Some(capacity) = capacity {
        validate_capacity(capacity)?;
    }
    if let Some(hours) = validity_hours {
        validate_validity_hours(hours)?;
    }
    Ok(())
}

/// A room can only be deleted after it has been deactivated.
pub fn check_can_delete(is_active: bool) -> Result<(), CoreError> {
    if is_active {
        return Err(CoreError::Validation(
            "Salas ativas não podem ser excluídas. Desative a sala primeiro.".into(),
        ));
    }
    Ok(())
}
