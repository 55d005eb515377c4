//! Repository for the `permissions` table.

use sqlx::PgPool;
use warden_core::types::DbId;

use crate::models::permission::{CreatePermission, Permission, UpdatePermission};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, created_at, updated_at";

/// Provides CRUD operations for permissions.
pub struct PermissionRepo;

impl PermissionRepo {
    /// Insert a new permission, returning the created row.
    ///
    /// Fails with a unique violation on `uq_permissions_code` if the code
    /// is taken.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePermission,
    ) -> Result<Permission, sqlx::Error> {
        let query = format!(
            "INSERT INTO permissions (code, name)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Permission>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a permission by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Permission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM permissions WHERE id = $1");
        sqlx::query_as::<_, Permission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all permissions ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Permission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM permissions ORDER BY id ASC");
        sqlx::query_as::<_, Permission>(&query).fetch_all(pool).await
    }

    /// Update a permission. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePermission,
    ) -> Result<Option<Permission>, sqlx::Error> {
        let query = format!(
            "UPDATE permissions SET
                code = COALESCE($2, code),
                name = COALESCE($3, name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Permission>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a permission by ID. Returns `true` if a row was removed.
    ///
    /// `role_permissions` rows referencing it go with it (`ON DELETE CASCADE`).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
