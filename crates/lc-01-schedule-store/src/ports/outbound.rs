//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the managing stores require from the host.
//!
//! Production state is externally durable and merklized; tests use the
//! in-memory adapters in [`crate::adapters`].

use shared_types::{AccountId, EntityId};

/// A keyed, change-tracked entity collection.
///
/// Mutating a committed value goes through [`Self::get_for_modify`] followed
/// by [`Self::replace`], so the collection observes every change.
pub trait BackingCollection<K, V>: Send {
    fn get(&self, key: &K) -> Option<&V>;

    /// Detached copy of the value for modification. Must be written back
    /// with [`Self::replace`].
    fn get_for_modify(&mut self, key: &K) -> Option<V>;

    fn put(&mut self, key: K, value: V);

    fn replace(&mut self, key: K, value: V);

    fn remove(&mut self, key: &K) -> Option<V>;

    fn contains(&self, key: &K) -> bool;

    fn for_each(&self, visitor: &mut dyn FnMut(&K, &V));

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root hash over the collection, used for forensic dumps.
    fn root_hash(&self) -> [u8; 32];
}

/// Allocates entity numbers.
pub trait EntityIdSource: Send + Sync {
    /// Next id in the sponsor's shard and realm.
    fn new_entity_id(&self, sponsor: &EntityId) -> EntityId;

    /// Returns the most recently allocated number to the pool.
    fn reclaim_last_id(&self);
}

/// Read access to accounts referenced by new entities.
pub trait AccountLookup {
    /// Exists and is not deleted.
    fn is_usable(&self, id: &AccountId) -> bool;
}
