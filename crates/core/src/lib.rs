//! Domain core for the Warden RBAC backend.
//!
//! Pure logic only: identifier types, the error taxonomy, field validation,
//! relation rules, effective-permission computation, and password hashing.
//! Nothing in here touches the database or the network.

pub mod error;
pub mod password;
pub mod permissions;
pub mod relations;
pub mod types;
pub mod validation;
