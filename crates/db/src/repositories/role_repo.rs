//! Repository for the seeded `roles` table.

use sqlx::PgPool;
use zeladoria_core::types::DbId;

use crate::models::role::Role;

/// Read-only access to roles.
pub struct RoleRepo;

impl RoleRepo {
    /// List all roles ordered by ID.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name, description, created_at FROM roles ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Resolve a role ID to its name. Fails with `RowNotFound` for unknown IDs.
    pub async fn resolve_name(pool: &PgPool, role_id: DbId) -> Result<String, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_one(pool)
            .await
    }
}
