//! Effective-permission computation.
//!
//! A role's effective permissions are just its own set. A person's are the
//! distinct union over every role they hold; a permission reachable through
//! two roles appears once.

use std::collections::BTreeMap;

use crate::types::{DbId, Identified};

/// Distinct union of `groups`, ordered by id.
///
/// When the same id appears in several groups the first occurrence wins.
pub fn union_distinct<'a, T, G>(groups: G) -> Vec<T>
where
    T: Identified + Clone + 'a,
    G: IntoIterator<Item = &'a [T]>,
{
    let mut by_id: BTreeMap<DbId, T> = BTreeMap::new();
    for group in groups {
        for item in group {
            by_id.entry(item.id()).or_insert_with(|| item.clone());
        }
    }
    by_id.into_values().collect()
}
