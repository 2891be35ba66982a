//! Cleaning workflow: state transitions under row locks, and the periodic
//! expiry check.
//!
//! The rules live in `zeladoria_core::cleaning`; this module loads the facts
//! inside a transaction, applies the rules and writes the result.

pub mod controller;
pub mod expiry;
