//! In-process [`RbacStore`] backed by ordered maps and sets.
//!
//! Mirrors the PostgreSQL schema: three entity maps, two join sets of
//! `(owner_id, target_id)` pairs, the same uniqueness rules, and cascading
//! detachment on delete. A single `RwLock` makes every operation atomic.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use warden_core::error::CoreError;
use warden_core::relations::{plan_add, plan_remove, Mutation, PairState, Relation};
use warden_core::types::DbId;
use warden_core::validation::{DUPLICATE_CODE, DUPLICATE_EMAIL};

use super::{RbacStore, StoreResult};
use crate::models::permission::{CreatePermission, Permission, UpdatePermission};
use crate::models::person::{NewPerson, Person, PersonChanges, PersonDetail};
use crate::models::role::{CreateRole, Role, RoleDetail, UpdateRole};

#[derive(Default)]
struct Tables {
    last_permission_id: DbId,
    last_role_id: DbId,
    last_person_id: DbId,
    permissions: BTreeMap<DbId, Permission>,
    roles: BTreeMap<DbId, Role>,
    persons: BTreeMap<DbId, Person>,
    role_permissions: BTreeSet<(DbId, DbId)>,
    person_roles: BTreeSet<(DbId, DbId)>,
}

/// Every target id paired with `owner_id`, ascending.
fn targets_of(set: &BTreeSet<(DbId, DbId)>, owner_id: DbId) -> impl Iterator<Item = DbId> + '_ {
    set.range((owner_id, DbId::MIN)..=(owner_id, DbId::MAX))
        .map(|&(_, target_id)| target_id)
}

impl Tables {
    fn code_taken(&self, code: &str, except: Option<DbId>) -> bool {
        self.permissions
            .values()
            .any(|p| p.code == code && Some(p.id) != except)
    }

    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.persons
            .values()
            .any(|p| p.email == email && Some(p.id) != except)
    }

    fn role_detail(&self, role: &Role) -> RoleDetail {
        let permissions = targets_of(&self.role_permissions, role.id)
            .filter_map(|id| self.permissions.get(&id).cloned())
            .collect();
        RoleDetail {
            role: role.clone(),
            permissions,
        }
    }

    fn person_detail(&self, person: &Person) -> PersonDetail {
        let roles = targets_of(&self.person_roles, person.id)
            .filter_map(|id| self.roles.get(&id))
            .map(|role| self.role_detail(role))
            .collect();
        PersonDetail::new(person.clone(), roles)
    }

    fn pair_state(&self, relation: Relation, owner_id: DbId, target_id: DbId) -> PairState {
        let pair = (owner_id, target_id);
        match relation {
            Relation::RolePermission => PairState {
                owner_exists: self.roles.contains_key(&owner_id),
                target_exists: self.permissions.contains_key(&target_id),
                is_member: self.role_permissions.contains(&pair),
            },
            Relation::PersonRole => PairState {
                owner_exists: self.persons.contains_key(&owner_id),
                target_exists: self.roles.contains_key(&target_id),
                is_member: self.person_roles.contains(&pair),
            },
        }
    }

    fn join_set(&mut self, relation: Relation) -> &mut BTreeSet<(DbId, DbId)> {
        match relation {
            Relation::RolePermission => &mut self.role_permissions,
            Relation::PersonRole => &mut self.person_roles,
        }
    }
}

/// Store holding all records in memory. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RbacStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {
        tracing::debug!("In-memory store closed");
    }

    async fn create_permission(&self, input: &CreatePermission) -> StoreResult<Permission> {
        let mut t = self.tables.write().await;
        if t.code_taken(&input.code, None) {
            return Err(CoreError::field("code", DUPLICATE_CODE).into());
        }
        t.last_permission_id += 1;
        let now = Utc::now();
        let permission = Permission {
            id: t.last_permission_id,
            code: input.code.clone(),
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };
        t.permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn list_permissions(&self) -> StoreResult<Vec<Permission>> {
        let t = self.tables.read().await;
        Ok(t.permissions.values().cloned().collect())
    }

    async fn find_permission(&self, id: DbId) -> StoreResult<Option<Permission>> {
        let t = self.tables.read().await;
        Ok(t.permissions.get(&id).cloned())
    }

    async fn update_permission(
        &self,
        id: DbId,
        input: &UpdatePermission,
    ) -> StoreResult<Option<Permission>> {
        let mut t = self.tables.write().await;
        if !t.permissions.contains_key(&id) {
            return Ok(None);
        }
        if let Some(code) = &input.code {
            if t.code_taken(code, Some(id)) {
                return Err(CoreError::field("code", DUPLICATE_CODE).into());
            }
        }
        let Some(permission) = t.permissions.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(code) = &input.code {
            permission.code = code.clone();
        }
        if let Some(name) = &input.name {
            permission.name = name.clone();
        }
        permission.updated_at = Utc::now();
        Ok(Some(permission.clone()))
    }

    async fn delete_permission(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if t.permissions.remove(&id).is_none() {
            return Ok(false);
        }
        t.role_permissions.retain(|&(_, permission_id)| permission_id != id);
        Ok(true)
    }

    async fn create_role(&self, input: &CreateRole) -> StoreResult<RoleDetail> {
        let mut t = self.tables.write().await;
        t.last_role_id += 1;
        let now = Utc::now();
        let role = Role {
            id: t.last_role_id,
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };
        t.roles.insert(role.id, role.clone());
        Ok(RoleDetail {
            role,
            permissions: Vec::new(),
        })
    }

    async fn list_roles(&self) -> StoreResult<Vec<RoleDetail>> {
        let t = self.tables.read().await;
        Ok(t.roles.values().map(|role| t.role_detail(role)).collect())
    }

    async fn find_role(&self, id: DbId) -> StoreResult<Option<RoleDetail>> {
        let t = self.tables.read().await;
        Ok(t.roles.get(&id).map(|role| t.role_detail(role)))
    }

    async fn update_role(&self, id: DbId, input: &UpdateRole) -> StoreResult<Option<RoleDetail>> {
        let mut t = self.tables.write().await;
        let Some(role) = t.roles.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            role.name = name.clone();
        }
        role.updated_at = Utc::now();
        let role = role.clone();
        Ok(Some(t.role_detail(&role)))
    }

    async fn delete_role(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if t.roles.remove(&id).is_none() {
            return Ok(false);
        }
        t.role_permissions.retain(|&(role_id, _)| role_id != id);
        t.person_roles.retain(|&(_, role_id)| role_id != id);
        Ok(true)
    }

    async fn create_person(&self, input: &NewPerson) -> StoreResult<PersonDetail> {
        let mut t = self.tables.write().await;
        if t.email_taken(&input.email, None) {
            return Err(CoreError::field("email", DUPLICATE_EMAIL).into());
        }
        t.last_person_id += 1;
        let now = Utc::now();
        let person = Person {
            id: t.last_person_id,
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        t.persons.insert(person.id, person.clone());
        Ok(PersonDetail::new(person, Vec::new()))
    }

    async fn list_persons(&self) -> StoreResult<Vec<PersonDetail>> {
        let t = self.tables.read().await;
        Ok(t.persons.values().map(|p| t.person_detail(p)).collect())
    }

    async fn find_person(&self, id: DbId) -> StoreResult<Option<PersonDetail>> {
        let t = self.tables.read().await;
        Ok(t.persons.get(&id).map(|p| t.person_detail(p)))
    }

    async fn update_person(
        &self,
        id: DbId,
        input: &PersonChanges,
    ) -> StoreResult<Option<PersonDetail>> {
        let mut t = self.tables.write().await;
        if !t.persons.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &input.email {
            if t.email_taken(email, Some(id)) {
                return Err(CoreError::field("email", DUPLICATE_EMAIL).into());
            }
        }
        let Some(person) = t.persons.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            person.name = name.clone();
        }
        if let Some(email) = &input.email {
            person.email = email.clone();
        }
        if let Some(hash) = &input.password_hash {
            person.password_hash = Some(hash.clone());
        }
        person.updated_at = Utc::now();
        let person = person.clone();
        Ok(Some(t.person_detail(&person)))
    }

    async fn delete_person(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if t.persons.remove(&id).is_none() {
            return Ok(false);
        }
        t.person_roles.retain(|&(person_id, _)| person_id != id);
        Ok(true)
    }

    async fn add_relation(
        &self,
        relation: Relation,
        owner_id: DbId,
        target_id: DbId,
    ) -> StoreResult<Mutation> {
        let mut t = self.tables.write().await;
        let state = t.pair_state(relation, owner_id, target_id);
        let mutation = plan_add(relation, owner_id, target_id, state)?;
        if mutation == Mutation::Insert {
            t.join_set(relation).insert((owner_id, target_id));
        }
        Ok(mutation)
    }

    async fn remove_relation(
        &self,
        relation: Relation,
        owner_id: DbId,
        target_id: DbId,
    ) -> StoreResult<Mutation> {
        let mut t = self.tables.write().await;
        let state = t.pair_state(relation, owner_id, target_id);
        let mutation = plan_remove(relation, owner_id, target_id, state)?;
        t.join_set(relation).remove(&(owner_id, target_id));
        Ok(mutation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_of_only_yields_the_owner_slice() {
        let set: BTreeSet<(DbId, DbId)> = [(1, 5), (2, 3), (2, 9), (3, 1)].into_iter().collect();
        assert_eq!(targets_of(&set, 2).collect::<Vec<_>>(), vec![3, 9]);
        assert_eq!(targets_of(&set, 4).count(), 0);
    }
}
