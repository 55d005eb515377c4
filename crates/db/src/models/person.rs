//! Person entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use warden_core::types::{DbId, Timestamp};

use crate::models::role::RoleDetail;

/// Full person row from the `persons` table.
///
/// Contains the password hash -- NEVER serialize this to API responses.
/// Use [`PersonDetail`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Person {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe person representation for API responses: no password hash, roles
/// embedded with their permissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonDetail {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub roles: Vec<RoleDetail>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PersonDetail {
    pub fn new(person: Person, roles: Vec<RoleDetail>) -> Self {
        Self {
            id: person.id,
            name: person.name,
            email: person.email,
            roles,
            created_at: person.created_at,
            updated_at: person.updated_at,
        }
    }
}

/// DTO for creating a person. Also the body of a full `PUT` update.
///
/// `password` is write-only; it is hashed before it reaches the store.
/// A `roles` array in the request body is ignored; use the `add_role` /
/// `remove_role` actions instead.
#[derive(Clone, Deserialize, Validate)]
pub struct CreatePerson {
    #[validate(length(min = 1, max = 100, message = "Ensure this field has 1 to 100 characters."))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "Ensure this field has 1 to 128 characters."))]
    pub password: Option<String>,
}

/// DTO for a partial update. Only provided fields change.
#[derive(Clone, Default, Deserialize, Validate)]
pub struct UpdatePerson {
    #[validate(length(min = 1, max = 100, message = "Ensure this field has 1 to 100 characters."))]
    pub name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Ensure this field has 1 to 128 characters."))]
    pub password: Option<String>,
}

impl From<CreatePerson> for UpdatePerson {
    fn from(input: CreatePerson) -> Self {
        Self {
            name: Some(input.name),
            email: Some(input.email),
            password: input.password,
        }
    }
}

/// Insert shape handed to the store once the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
}

/// Update shape handed to the store once the password has been hashed.
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PersonChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Body of `POST /users/{id}/add_role` and `/remove_role`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonRoleRequest {
    pub role_id: Option<DbId>,
}
