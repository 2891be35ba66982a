//! Domain logic for the zeladoria backend.
//!
//! This crate has zero internal dependencies so it can be shared by the
//! repository layer, the HTTP server and any future CLI tooling.

pub mod cleaning;
pub mod cleaning_status;
pub mod error;
pub mod expiry;
pub mod notification;
pub mod roles;
pub mod room;
pub mod storage;
pub mod types;
