//! PostgreSQL-backed [`RbacStore`].

use async_trait::async_trait;
use warden_core::error::CoreError;
use warden_core::relations::{plan_add, plan_remove, Mutation, Relation};
use warden_core::types::DbId;
use warden_core::validation::{DUPLICATE_CODE, DUPLICATE_EMAIL};

use super::{RbacStore, StoreError, StoreResult};
use crate::models::permission::{CreatePermission, Permission, UpdatePermission};
use crate::models::person::{NewPerson, PersonChanges, PersonDetail};
use crate::models::role::{CreateRole, RoleDetail, UpdateRole};
use crate::repositories::{PermissionRepo, PersonRepo, RelationRepo, RoleRepo};
use crate::DbPool;

/// Store over a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Turn a unique-constraint violation on a known constraint into a field
/// validation error; pass every other failure through unchanged.
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            match db_err.constraint() {
                Some("uq_permissions_code") => {
                    return CoreError::field("code", DUPLICATE_CODE).into();
                }
                Some("uq_persons_email") => {
                    return CoreError::field("email", DUPLICATE_EMAIL).into();
                }
                _ => {}
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl RbacStore for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection pool closed");
    }

    async fn create_permission(&self, input: &CreatePermission) -> StoreResult<Permission> {
        PermissionRepo::create(&self.pool, input)
            .await
            .map_err(map_unique_violation)
    }

    async fn list_permissions(&self) -> StoreResult<Vec<Permission>> {
        Ok(PermissionRepo::list(&self.pool).await?)
    }

    async fn find_permission(&self, id: DbId) -> StoreResult<Option<Permission>> {
        Ok(PermissionRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update_permission(
        &self,
        id: DbId,
        input: &UpdatePermission,
    ) -> StoreResult<Option<Permission>> {
        PermissionRepo::update(&self.pool, id, input)
            .await
            .map_err(map_unique_violation)
    }

    async fn delete_permission(&self, id: DbId) -> StoreResult<bool> {
        Ok(PermissionRepo::delete(&self.pool, id).await?)
    }

    async fn create_role(&self, input: &CreateRole) -> StoreResult<RoleDetail> {
        let role = RoleRepo::create(&self.pool, input).await?;
        Ok(RoleDetail {
            role,
            permissions: Vec::new(),
        })
    }

    async fn list_roles(&self) -> StoreResult<Vec<RoleDetail>> {
        Ok(RoleRepo::list_detail(&self.pool).await?)
    }

    async fn find_role(&self, id: DbId) -> StoreResult<Option<RoleDetail>> {
        Ok(RoleRepo::find_detail(&self.pool, id).await?)
    }

    async fn update_role(&self, id: DbId, input: &UpdateRole) -> StoreResult<Option<RoleDetail>> {
        match RoleRepo::update(&self.pool, id, input).await? {
            Some(role) => {
                let permissions = RoleRepo::permissions_for_role(&self.pool, role.id).await?;
                Ok(Some(RoleDetail { role, permissions }))
            }
            None => Ok(None),
        }
    }

    async fn delete_role(&self, id: DbId) -> StoreResult<bool> {
        Ok(RoleRepo::delete(&self.pool, id).await?)
    }

    async fn create_person(&self, input: &NewPerson) -> StoreResult<PersonDetail> {
        let person = PersonRepo::create(&self.pool, input)
            .await
            .map_err(map_unique_violation)?;
        Ok(PersonDetail::new(person, Vec::new()))
    }

    async fn list_persons(&self) -> StoreResult<Vec<PersonDetail>> {
        Ok(PersonRepo::list_detail(&self.pool).await?)
    }

    async fn find_person(&self, id: DbId) -> StoreResult<Option<PersonDetail>> {
        Ok(PersonRepo::find_detail(&self.pool, id).await?)
    }

    async fn update_person(
        &self,
        id: DbId,
        input: &PersonChanges,
    ) -> StoreResult<Option<PersonDetail>> {
        let updated = PersonRepo::update(&self.pool, id, input)
            .await
            .map_err(map_unique_violation)?;
        match updated {
            Some(person) => Ok(PersonRepo::attach_roles(&self.pool, vec![person])
                .await?
                .pop()),
            None => Ok(None),
        }
    }

    async fn delete_person(&self, id: DbId) -> StoreResult<bool> {
        Ok(PersonRepo::delete(&self.pool, id).await?)
    }

    async fn add_relation(
        &self,
        relation: Relation,
        owner_id: DbId,
        target_id: DbId,
    ) -> StoreResult<Mutation> {
        let mut tx = self.pool.begin().await?;
        let state = RelationRepo::lock_pair(&mut *tx, relation, owner_id, target_id).await?;
        let mutation = plan_add(relation, owner_id, target_id, state)?;
        if mutation == Mutation::Insert {
            RelationRepo::insert(&mut *tx, relation, owner_id, target_id).await?;
        }
        tx.commit().await?;
        Ok(mutation)
    }

    async fn remove_relation(
        &self,
        relation: Relation,
        owner_id: DbId,
        target_id: DbId,
    ) -> StoreResult<Mutation> {
        let mut tx = self.pool.begin().await?;
        let state = RelationRepo::lock_pair(&mut *tx, relation, owner_id, target_id).await?;
        let mutation = plan_remove(relation, owner_id, target_id, state)?;
        RelationRepo::delete(&mut *tx, relation, owner_id, target_id).await?;
        tx.commit().await?;
        Ok(mutation)
    }
}
