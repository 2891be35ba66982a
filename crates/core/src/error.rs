use crate::cleaning::CleaningError;
use crate::types::DbId;

/// Domain-level error type shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookup by external identifier (room UUID) failed.
    #[error("{entity} '{key}' not found")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A cleaning workflow rule rejected the operation.
    #[error(transparent)]
    Cleaning(#[from] CleaningError),

    #[error("Internal error: {0}")]
    Internal(String),
}
