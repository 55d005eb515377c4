//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A read shape embedding related entities (where the entity owns a relation)
//! - `Deserialize` + `Validate` create and update DTOs
//!
//! Read shapes and write shapes are separate: nothing a client
//! sends to a CRUD endpoint can overwrite a relation set.

pub mod permission;
pub mod person;
pub mod role;
