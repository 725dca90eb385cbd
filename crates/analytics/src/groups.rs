//! Group membership lookup
//!
//! Membership is resolved once per request, at selector build time; the
//! resulting user list is a point-in-time snapshot, not kept consistent
//! with later membership changes.

use std::collections::BTreeMap;

use crate::error::Result;

/// Resolves the members of a group
///
/// Implemented by the host system's group service.
pub trait GroupLookup {
    /// User ids belonging to the group; empty when the group has no members
    /// or does not exist
    fn members_of(&self, group_id: i64) -> Result<Vec<i64>>;
}

/// Map-backed group membership, for tests and local use
#[derive(Debug, Clone, Default)]
pub struct StaticGroups {
    groups: BTreeMap<i64, Vec<i64>>,
}

impl StaticGroups {
    /// Create an empty lookup (every group resolves to no members)
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group with its members
    pub fn with_group(mut self, group_id: i64, members: Vec<i64>) -> Self {
        self.groups.insert(group_id, members);
        self
    }
}

impl GroupLookup for StaticGroups {
    fn members_of(&self, group_id: i64) -> Result<Vec<i64>> {
        Ok(self.groups.get(&group_id).cloned().unwrap_or_default())
    }
}
