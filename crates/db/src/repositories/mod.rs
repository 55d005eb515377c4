//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Plain
//! CRUD takes `&PgPool`; anything that must run inside a caller's
//! transaction takes `&mut PgConnection` instead.

pub mod permission_repo;
pub mod person_repo;
pub mod relation_repo;
pub mod role_repo;

pub use permission_repo::PermissionRepo;
pub use person_repo::PersonRepo;
pub use relation_repo::RelationRepo;
pub use role_repo::RoleRepo;
