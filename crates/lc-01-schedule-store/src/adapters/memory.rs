use crate::ports::outbound::{AccountLookup, BackingCollection, EntityIdSource};
use serde::Serialize;
use shared_crypto::blake3_hash_many;
use shared_types::{AccountId, EntityId};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Ordered in-memory collection with a modification counter.
///
/// Iteration is in key order, so [`BackingCollection::root_hash`] is a pure
/// function of the contents.
#[derive(Debug, Clone)]
pub struct InMemoryCollection<K, V> {
    data: BTreeMap<K, V>,
    modifications: u64,
}

impl<K, V> Default for InMemoryCollection<K, V> {
    fn default() -> Self {
        Self {
            data: BTreeMap::new(),
            modifications: 0,
        }
    }
}

impl<K, V> InMemoryCollection<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes (`put`, `replace`, `remove`) observed.
    pub fn modifications(&self) -> u64 {
        self.modifications
    }
}

impl<K, V> BackingCollection<K, V> for InMemoryCollection<K, V>
where
    K: Ord + Clone + Serialize + Send,
    V: Clone + Serialize + Send,
{
    fn get(&self, key: &K) -> Option<&V> {
        self.data.get(key)
    }

    fn get_for_modify(&mut self, key: &K) -> Option<V> {
        self.data.get(key).cloned()
    }

    fn put(&mut self, key: K, value: V) {
        self.modifications += 1;
        self.data.insert(key, value);
    }

    fn replace(&mut self, key: K, value: V) {
        self.modifications += 1;
        self.data.insert(key, value);
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.data.remove(key);
        if removed.is_some() {
            self.modifications += 1;
        }
        removed
    }

    fn contains(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    fn for_each(&self, visitor: &mut dyn FnMut(&K, &V)) {
        for (k, v) in &self.data {
            visitor(k, v);
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn root_hash(&self) -> [u8; 32] {
        // Entries that fail to encode contribute an empty leaf.
        let leaves: Vec<Vec<u8>> = self
            .data
            .iter()
            .map(|(k, v)| bincode::serialize(&(k, v)).unwrap_or_default())
            .collect();
        let refs: Vec<&[u8]> = leaves.iter().map(Vec::as_slice).collect();
        blake3_hash_many(&refs)
    }
}

/// Hands out increasing entity numbers starting from a seed.
#[derive(Debug)]
pub struct SequentialIdSource {
    next: AtomicU64,
}

impl SequentialIdSource {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The number the next allocation will use.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

impl EntityIdSource for SequentialIdSource {
    fn new_entity_id(&self, sponsor: &EntityId) -> EntityId {
        let num = self.next.fetch_add(1, Ordering::SeqCst);
        EntityId::new(sponsor.shard, sponsor.realm, num)
    }

    fn reclaim_last_id(&self) {
        self.next.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Fixed set of usable accounts.
#[derive(Debug, Default, Clone)]
pub struct KnownAccounts {
    usable: HashSet<AccountId>,
}

impl KnownAccounts {
    pub fn new(accounts: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            usable: accounts.into_iter().collect(),
        }
    }
}

impl AccountLookup for KnownAccounts {
    fn is_usable(&self, id: &AccountId) -> bool {
        self.usable.contains(id)
    }
}
