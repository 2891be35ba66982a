//! In-app notification fan-out.
//!
//! The [`NotificationDispatcher`] decides who hears about a room event and
//! persists one notification row per recipient.

pub mod dispatcher;

pub use dispatcher::NotificationDispatcher;
