//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000001_create_roles_and_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
/// Cleaning staff. Starts and finishes cleanings, attaches photos.
pub const ROLE_ZELADORIA: &str = "zeladoria";
/// Service requesters. The only role allowed to report a room as dirty.
pub const ROLE_SOLICITANTE: &str = "solicitante";

/// Seeded `roles.id` of [`ROLE_ADMIN`].
pub const ROLE_ADMIN_ID: i64 = 1;
/// Seeded `roles.id` of [`ROLE_ZELADORIA`].
pub const ROLE_ZELADORIA_ID: i64 = 2;
/// Seeded `roles.id` of [`ROLE_SOLICITANTE`].
pub const ROLE_SOLICITANTE_ID: i64 = 3;
