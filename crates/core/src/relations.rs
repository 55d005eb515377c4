//! Rules for the two many-to-many relations (role -> permission,
//! person -> role).
//!
//! Both relations share one contract:
//!
//! - **add** is "ensure present": the owner and the target must exist, and
//!   adding a pair that is already there succeeds without changing anything.
//! - **remove** is "assert present, then remove": the owner and the target
//!   must exist *and* the pair must currently be a member, otherwise the
//!   call is rejected with [`CoreError::InvalidState`].
//!
//! The functions here only decide; the store gathers the facts inside its
//! transaction, asks for a [`Mutation`], and applies it.

use crate::error::CoreError;
use crate::types::DbId;

/// One of the two owner -> target relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// A role holds permissions (`role_permissions` join table).
    RolePermission,
    /// A person holds roles (`person_roles` join table).
    PersonRole,
}

impl Relation {
    /// Entity name of the owning side, used in `NotFound` errors.
    pub fn owner_entity(self) -> &'static str {
        match self {
            Relation::RolePermission => "Role",
            Relation::PersonRole => "Person",
        }
    }

    /// Entity name of the target side, used in `NotFound` errors.
    pub fn target_entity(self) -> &'static str {
        match self {
            Relation::RolePermission => "Permission",
            Relation::PersonRole => "Role",
        }
    }

    /// Status text returned after a successful add.
    pub fn added_status(self) -> &'static str {
        match self {
            Relation::RolePermission => "permission added",
            Relation::PersonRole => "role added",
        }
    }

    /// Status text returned after a successful remove.
    pub fn removed_status(self) -> &'static str {
        match self {
            Relation::RolePermission => "Permission removed successfully.",
            Relation::PersonRole => "role removed",
        }
    }

    /// Error text for removing a pair that is not a member. Clients match
    /// on this string, so it must not change.
    pub fn not_member_message(self) -> &'static str {
        match self {
            Relation::RolePermission => "The role does not have this permission.",
            Relation::PersonRole => "The person does not have this role.",
        }
    }
}

/// What the store observed about an (owner, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairState {
    pub owner_exists: bool,
    pub target_exists: bool,
    pub is_member: bool,
}

/// The change the store must apply to the join set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Insert,
    Delete,
    /// Nothing to write; the set already has the requested shape.
    Unchanged,
}

fn check_exists(
    relation: Relation,
    owner_id: DbId,
    target_id: DbId,
    state: PairState,
) -> Result<(), CoreError> {
    if !state.owner_exists {
        return Err(CoreError::NotFound {
            entity: relation.owner_entity(),
            id: owner_id,
        });
    }
    if !state.target_exists {
        return Err(CoreError::NotFound {
            entity: relation.target_entity(),
            id: target_id,
        });
    }
    Ok(())
}

/// Decide the outcome of adding `target_id` to `owner_id`'s set.
pub fn plan_add(
    relation: Relation,
    owner_id: DbId,
    target_id: DbId,
    state: PairState,
) -> Result<Mutation, CoreError> {
    check_exists(relation, owner_id, target_id, state)?;
    if state.is_member {
        Ok(Mutation::Unchanged)
    } else {
        Ok(Mutation::Insert)
    }
}

/// Decide the outcome of removing `target_id` from `owner_id`'s set.
pub fn plan_remove(
    relation: Relation,
    owner_id: DbId,
    target_id: DbId,
    state: PairState,
) -> Result<Mutation, CoreError> {
    check_exists(relation, owner_id, target_id, state)?;
    if state.is_member {
        Ok(Mutation::Delete)
    } else {
        Err(CoreError::InvalidState(
            relation.not_member_message().to_string(),
        ))
    }
}
