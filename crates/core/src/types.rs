/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Anything addressable by its surrogate key.
///
/// Lets set-style helpers (dedupe, union) work across permissions, roles,
/// and persons without knowing their concrete shape.
pub trait Identified {
    fn id(&self) -> DbId;
}
