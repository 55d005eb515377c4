//! The persistence seam the HTTP layer depends on.
//!
//! Handlers hold an `Arc<dyn RbacStore>` and never see which backend is
//! behind it. [`PgStore`] is the production backend (repositories over a
//! connection pool); [`MemoryStore`] keeps everything in process and backs
//! the HTTP tests and throwaway local runs.
//!
//! Each method is one unit of work. Relation changes in particular run
//! their existence checks, membership check, and write atomically.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use warden_core::error::CoreError;
use warden_core::permissions::union_distinct;
use warden_core::relations::{Mutation, Relation};
use warden_core::types::DbId;

use crate::models::permission::{CreatePermission, Permission, UpdatePermission};
use crate::models::person::{NewPerson, PersonChanges, PersonDetail};
use crate::models::role::{CreateRole, RoleDetail, UpdateRole};

/// Errors surfaced by a store: domain failures (not found, validation,
/// invalid state) or an underlying database failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RbacStore: Send + Sync {
    /// Confirm the backend can serve requests.
    async fn health_check(&self) -> StoreResult<()>;

    /// Release backend resources. Called once at shutdown.
    async fn close(&self);

    // --- Permissions ---

    async fn create_permission(&self, input: &CreatePermission) -> StoreResult<Permission>;
    async fn list_permissions(&self) -> StoreResult<Vec<Permission>>;
    async fn find_permission(&self, id: DbId) -> StoreResult<Option<Permission>>;
    async fn update_permission(
        &self,
        id: DbId,
        input: &UpdatePermission,
    ) -> StoreResult<Option<Permission>>;
    async fn delete_permission(&self, id: DbId) -> StoreResult<bool>;

    // --- Roles ---

    async fn create_role(&self, input: &CreateRole) -> StoreResult<RoleDetail>;
    async fn list_roles(&self) -> StoreResult<Vec<RoleDetail>>;
    async fn find_role(&self, id: DbId) -> StoreResult<Option<RoleDetail>>;
    async fn update_role(&self, id: DbId, input: &UpdateRole) -> StoreResult<Option<RoleDetail>>;
    async fn delete_role(&self, id: DbId) -> StoreResult<bool>;

    // --- Persons ---

    async fn create_person(&self, input: &NewPerson) -> StoreResult<PersonDetail>;
    async fn list_persons(&self) -> StoreResult<Vec<PersonDetail>>;
    async fn find_person(&self, id: DbId) -> StoreResult<Option<PersonDetail>>;
    async fn update_person(
        &self,
        id: DbId,
        input: &PersonChanges,
    ) -> StoreResult<Option<PersonDetail>>;
    async fn delete_person(&self, id: DbId) -> StoreResult<bool>;

    // --- Relations ---

    /// Ensure `target_id` is in `owner_id`'s set. Adding a present pair
    /// returns [`Mutation::Unchanged`].
    async fn add_relation(
        &self,
        relation: Relation,
        owner_id: DbId,
        target_id: DbId,
    ) -> StoreResult<Mutation>;

    /// Remove `target_id` from `owner_id`'s set, failing with
    /// [`CoreError::InvalidState`] if it is not there.
    async fn remove_relation(
        &self,
        relation: Relation,
        owner_id: DbId,
        target_id: DbId,
    ) -> StoreResult<Mutation>;

    // --- Derived views ---

    /// A role's effective permissions: exactly its own set.
    async fn role_permissions(&self, role_id: DbId) -> StoreResult<Option<Vec<Permission>>> {
        Ok(self.find_role(role_id).await?.map(|role| role.permissions))
    }

    /// A person's effective permissions: the distinct union over their roles.
    async fn person_permissions(&self, person_id: DbId) -> StoreResult<Option<Vec<Permission>>> {
        Ok(self.find_person(person_id).await?.map(|person| {
            union_distinct(person.roles.iter().map(|role| role.permissions.as_slice()))
        }))
    }
}
