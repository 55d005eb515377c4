//! Repository for the `roles` table and the permissions embedded in role reads.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use warden_core::types::DbId;

use crate::models::permission::Permission;
use crate::models::role::{CreateRole, Role, RoleDetail, UpdateRole};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// A permission tagged with the role it was reached through.
#[derive(Debug, FromRow)]
struct RolePermissionRow {
    role_id: DbId,
    #[sqlx(flatten)]
    permission: Permission,
}

/// Provides CRUD operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Insert a new role, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateRole) -> Result<Role, sqlx::Error> {
        let query = format!(
            "INSERT INTO roles (name)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a role by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a role by ID, enriched with its permissions.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<RoleDetail>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(role) => {
                let permissions = Self::permissions_for_role(pool, role.id).await?;
                Ok(Some(RoleDetail { role, permissions }))
            }
            None => Ok(None),
        }
    }

    /// List all roles ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY id ASC");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }

    /// List all roles with their permissions, in two queries.
    pub async fn list_detail(pool: &PgPool) -> Result<Vec<RoleDetail>, sqlx::Error> {
        let roles = Self::list(pool).await?;
        Self::attach_permissions(pool, roles).await
    }

    /// Update a role. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRole,
    ) -> Result<Option<Role>, sqlx::Error> {
        let query = format!(
            "UPDATE roles SET
                name = COALESCE($2, name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a role by ID. Returns `true` if a row was removed.
    ///
    /// Its `role_permissions` and `person_roles` rows cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permissions held by one role, ordered by permission ID.
    pub async fn permissions_for_role(
        pool: &PgPool,
        role_id: DbId,
    ) -> Result<Vec<Permission>, sqlx::Error> {
        sqlx::query_as::<_, Permission>(
            "SELECT p.id, p.code, p.name, p.created_at, p.updated_at
             FROM permissions p
             JOIN role_permissions rp ON rp.permission_id = p.id
             WHERE rp.role_id = $1
             ORDER BY p.id ASC",
        )
        .bind(role_id)
        .fetch_all(pool)
        .await
    }

    /// Pair each role with its permissions using a single join query.
    pub async fn attach_permissions(
        pool: &PgPool,
        roles: Vec<Role>,
    ) -> Result<Vec<RoleDetail>, sqlx::Error> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let role_ids: Vec<DbId> = roles.iter().map(|r| r.id).collect();
        let rows = sqlx::query_as::<_, RolePermissionRow>(
            "SELECT rp.role_id, p.id, p.code, p.name, p.created_at, p.updated_at
             FROM role_permissions rp
             JOIN permissions p ON p.id = rp.permission_id
             WHERE rp.role_id = ANY($1)
             ORDER BY p.id ASC",
        )
        .bind(&role_ids)
        .fetch_all(pool)
        .await?;

        let mut by_role: HashMap<DbId, Vec<Permission>> = HashMap::new();
        for row in rows {
            by_role.entry(row.role_id).or_default().push(row.permission);
        }

        Ok(roles
            .into_iter()
            .map(|role| {
                let permissions = by_role.remove(&role.id).unwrap_or_default();
                RoleDetail { role, permissions }
            })
            .collect())
    }
}
