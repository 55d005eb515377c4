//! Repository for the two join tables, `role_permissions` and `person_roles`.
//!
//! Every method takes `&mut PgConnection` so the store can run the whole
//! check-then-write sequence for one relation change inside one
//! transaction.

use sqlx::PgConnection;
use warden_core::relations::{PairState, Relation};
use warden_core::types::DbId;

/// Table and column names behind one relation.
struct Layout {
    owner_table: &'static str,
    target_table: &'static str,
    join_table: &'static str,
    owner_column: &'static str,
    target_column: &'static str,
}

fn layout(relation: Relation) -> Layout {
    match relation {
        Relation::RolePermission => Layout {
            owner_table: "roles",
            target_table: "permissions",
            join_table: "role_permissions",
            owner_column: "role_id",
            target_column: "permission_id",
        },
        Relation::PersonRole => Layout {
            owner_table: "persons",
            target_table: "roles",
            join_table: "person_roles",
            owner_column: "person_id",
            target_column: "role_id",
        },
    }
}

/// Provides membership reads and writes on the join tables.
pub struct RelationRepo;

impl RelationRepo {
    /// Observe everything the relation rules need. The owner row is locked
    /// `FOR UPDATE` so concurrent changes to the same owner's set queue
    /// behind this transaction; the target row is held `FOR KEY SHARE` so
    /// it cannot be deleted before the transaction ends.
    pub async fn lock_pair(
        conn: &mut PgConnection,
        relation: Relation,
        owner_id: DbId,
        target_id: DbId,
    ) -> Result<PairState, sqlx::Error> {
        let l = layout(relation);

        let owner: Option<(DbId,)> = sqlx::query_as(&format!(
            "SELECT id FROM {} WHERE id = $1 FOR UPDATE",
            l.owner_table
        ))
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await?;

        // Held until commit: a concurrent delete of the target waits.
        let target: Option<(DbId,)> = sqlx::query_as(&format!(
            "SELECT id FROM {} WHERE id = $1 FOR KEY SHARE",
            l.target_table
        ))
        .bind(target_id)
        .fetch_optional(&mut *conn)
        .await?;

        let (is_member,): (bool,) = sqlx::query_as(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE {} = $1 AND {} = $2)",
            l.join_table, l.owner_column, l.target_column
        ))
        .bind(owner_id)
        .bind(target_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(PairState {
            owner_exists: owner.is_some(),
            target_exists: target.is_some(),
            is_member,
        })
    }

    /// Insert a pair. A pair that already exists is left alone.
    pub async fn insert(
        conn: &mut PgConnection,
        relation: Relation,
        owner_id: DbId,
        target_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let l = layout(relation);
        let result = sqlx::query(&format!(
            "INSERT INTO {} ({}, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            l.join_table, l.owner_column, l.target_column
        ))
        .bind(owner_id)
        .bind(target_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a pair. Returns `true` if a row was removed.
    pub async fn delete(
        conn: &mut PgConnection,
        relation: Relation,
        owner_id: DbId,
        target_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let l = layout(relation);
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = $1 AND {} = $2",
            l.join_table, l.owner_column, l.target_column
        ))
        .bind(owner_id)
        .bind(target_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
