//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireZeladoria`] -- Requires the `zeladoria` role.
//! - [`rbac::RequireSolicitante`] -- Requires the `solicitante` role.
//! - [`rbac::RequireCleaningHistory`] -- Requires `admin` or `zeladoria`.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
