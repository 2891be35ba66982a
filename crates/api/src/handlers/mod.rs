//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers authorize through the RBAC extractors, delegate to the
//! repositories in `zeladoria_db` (or to [`crate::cleaning`] for workflow
//! transitions) and map errors via [`crate::error::AppError`].

pub mod admin;
pub mod auth;
pub mod cleaning;
pub mod history;
pub mod notification;
pub mod photo;
pub mod room;
