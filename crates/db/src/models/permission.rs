//! Permission entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use warden_core::types::{DbId, Identified, Timestamp};

/// A permission row from the `permissions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Permission {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identified for Permission {
    fn id(&self) -> DbId {
        self.id
    }
}

/// DTO for creating a permission. Also the body of a full `PUT` update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePermission {
    #[validate(length(min = 1, max = 7, message = "Ensure this field has 1 to 7 characters."))]
    pub code: String,
    #[validate(length(min = 1, max = 100, message = "Ensure this field has 1 to 100 characters."))]
    pub name: String,
}

/// DTO for a partial update. Only provided fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePermission {
    #[validate(length(min = 1, max = 7, message = "Ensure this field has 1 to 7 characters."))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Ensure this field has 1 to 100 characters."))]
    pub name: Option<String>,
}

impl From<CreatePermission> for UpdatePermission {
    fn from(input: CreatePermission) -> Self {
        Self {
            code: Some(input.code),
            name: Some(input.name),
        }
    }
}
