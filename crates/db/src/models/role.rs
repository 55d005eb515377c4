//! Role entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use warden_core::types::{DbId, Timestamp};

use crate::models::permission::Permission;

/// A role row from the `roles` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A role enriched with its permissions, as returned by every role read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleDetail {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// DTO for creating a role. Also the body of a full `PUT` update.
///
/// A `permissions` array in the request body is ignored; use the
/// `add_permission` / `remove_permission` actions instead.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRole {
    #[validate(length(min = 1, max = 100, message = "Ensure this field has 1 to 100 characters."))]
    pub name: String,
}

/// DTO for a partial update. Only provided fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRole {
    #[validate(length(min = 1, max = 100, message = "Ensure this field has 1 to 100 characters."))]
    pub name: Option<String>,
}

impl From<CreateRole> for UpdateRole {
    fn from(input: CreateRole) -> Self {
        Self {
            name: Some(input.name),
        }
    }
}

/// Body of `POST /roles/{id}/add_permission` and `/remove_permission`.
///
/// `permission_id` is optional so an absent field surfaces as a missing
/// permission (404) rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolePermissionRequest {
    pub permission_id: Option<DbId>,
}
