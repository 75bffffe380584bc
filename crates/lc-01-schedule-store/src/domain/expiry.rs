//! Expiry queue for committed entities, keyed by expiry second.

use shared_types::EntityId;
use std::collections::BTreeMap;

/// Entities ordered by the consensus second at which they expire.
#[derive(Debug, Default, Clone)]
pub struct ExpiringEntities {
    by_expiry: BTreeMap<i64, Vec<EntityId>>,
}

impl ExpiringEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, id: EntityId, expiry_secs: i64) {
        self.by_expiry.entry(expiry_secs).or_default().push(id);
    }

    /// Removes and returns every entity expiring at or before `now_secs`,
    /// earliest first.
    pub fn drain_expired(&mut self, now_secs: i64) -> Vec<EntityId> {
        let later = self.by_expiry.split_off(&now_secs.saturating_add(1));
        let due = std::mem::replace(&mut self.by_expiry, later);
        due.into_values().flatten().collect()
    }

    pub fn len(&self) -> usize {
        self.by_expiry.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_expiry.is_empty()
    }
}
