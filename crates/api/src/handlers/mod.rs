pub mod permission;
pub mod person;
pub mod role;

use warden_core::error::CoreError;
use warden_core::relations::Relation;
use warden_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Fail with `NotFound` unless the owner of a relation action exists.
///
/// Runs before the action body is read, so a missing owner wins over a
/// malformed body.
pub(crate) async fn require_owner(
    state: &AppState,
    relation: Relation,
    owner_id: DbId,
) -> AppResult<()> {
    let owner_exists = match relation {
        Relation::RolePermission => state.store.find_role(owner_id).await?.is_some(),
        Relation::PersonRole => state.store.find_person(owner_id).await?.is_some(),
    };
    if owner_exists {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: relation.owner_entity(),
            id: owner_id,
        }))
    }
}

/// Resolve the target id of a relation action body. An absent id is
/// reported as a target that matches nothing.
pub(crate) fn require_target(relation: Relation, target_id: Option<DbId>) -> AppResult<DbId> {
    target_id.ok_or_else(|| {
        AppError::NotFound(format!(
            "No {} matches the given query.",
            relation.target_entity()
        ))
    })
}
