//! Repository for the `persons` table and the roles embedded in person reads.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use warden_core::types::DbId;

use crate::models::person::{NewPerson, Person, PersonChanges, PersonDetail};
use crate::models::role::{Role, RoleDetail};
use crate::repositories::RoleRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// A role tagged with the person holding it.
#[derive(Debug, FromRow)]
struct PersonRoleRow {
    person_id: DbId,
    #[sqlx(flatten)]
    role: Role,
}

/// Provides CRUD operations for persons.
pub struct PersonRepo;

impl PersonRepo {
    /// Insert a new person, returning the created row.
    ///
    /// Fails with a unique violation on `uq_persons_email` if the email is
    /// taken.
    pub async fn create(pool: &PgPool, input: &NewPerson) -> Result<Person, sqlx::Error> {
        let query = format!(
            "INSERT INTO persons (name, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a person by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persons WHERE id = $1");
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a person by ID with roles and their permissions embedded.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PersonDetail>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(person) => {
                let mut details = Self::attach_roles(pool, vec![person]).await?;
                Ok(details.pop())
            }
            None => Ok(None),
        }
    }

    /// List all persons ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persons ORDER BY id ASC");
        sqlx::query_as::<_, Person>(&query).fetch_all(pool).await
    }

    /// List all persons with roles and permissions embedded.
    pub async fn list_detail(pool: &PgPool) -> Result<Vec<PersonDetail>, sqlx::Error> {
        let persons = Self::list(pool).await?;
        Self::attach_roles(pool, persons).await
    }

    /// Update a person. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &PersonChanges,
    ) -> Result<Option<Person>, sqlx::Error> {
        let query = format!(
            "UPDATE persons SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Delete a person by ID. Returns `true` if a row was removed.
    ///
    /// Their `person_roles` rows cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Pair each person with their roles (each carrying its permissions).
    pub async fn attach_roles(
        pool: &PgPool,
        persons: Vec<Person>,
    ) -> Result<Vec<PersonDetail>, sqlx::Error> {
        if persons.is_empty() {
            return Ok(Vec::new());
        }

        let person_ids: Vec<DbId> = persons.iter().map(|p| p.id).collect();
        let rows = sqlx::query_as::<_, PersonRoleRow>(
            "SELECT pr.person_id, r.id, r.name, r.created_at, r.updated_at
             FROM person_roles pr
             JOIN roles r ON r.id = pr.role_id
             WHERE pr.person_id = ANY($1)
             ORDER BY r.id ASC",
        )
        .bind(&person_ids)
        .fetch_all(pool)
        .await?;

        // Resolve each distinct role's permissions once, even when several
        // persons share it.
        let mut distinct_roles: Vec<Role> = Vec::new();
        for row in &rows {
            if !distinct_roles.iter().any(|r| r.id == row.role.id) {
                distinct_roles.push(row.role.clone());
            }
        }
        let role_details: HashMap<DbId, RoleDetail> =
            RoleRepo::attach_permissions(pool, distinct_roles)
                .await?
                .into_iter()
                .map(|detail| (detail.role.id, detail))
                .collect();

        let mut by_person: HashMap<DbId, Vec<RoleDetail>> = HashMap::new();
        for row in rows {
            if let Some(detail) = role_details.get(&row.role.id) {
                by_person
                    .entry(row.person_id)
                    .or_default()
                    .push(detail.clone());
            }
        }

        Ok(persons
            .into_iter()
            .map(|person| {
                let roles = by_person.remove(&person.id).unwrap_or_default();
                PersonDetail::new(person, roles)
            })
            .collect())
    }
}
