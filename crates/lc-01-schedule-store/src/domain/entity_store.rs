//! # Managing Store
//!
//! Two-phase lifecycle over a keyed collection: at most one entity is
//! *pending creation* at a time and is visible only through its own id until
//! committed.
//!
//! | Operation | Pending id | Committed id | Unknown id |
//! |-----------|------------|--------------|------------|
//! | `get` | provisional entity | collection entry | `NotFound` |
//! | `apply` | mutate in place | get-for-modify, mutate, replace | `NotFound` |
//! | `remove` | no-op | removed from collection | `NotFound` |
//!
//! `commit_creation` and `rollback_creation` are the only ways to clear the
//! pending slot; both fail with `NoCreationPending` when it is empty.

use super::errors::StoreError;
use crate::ports::outbound::{BackingCollection, EntityIdSource};
use shared_types::EntityId;
use std::fmt::Display;
use std::sync::Arc;

/// The single in-flight creation of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCreation<E> {
    pub id: EntityId,
    pub entity: E,
}

/// Generic provisional/commit/rollback store.
pub struct EntityStore<E, C> {
    ids: Arc<dyn EntityIdSource>,
    collection: C,
    pending: Option<PendingCreation<E>>,
}

impl<E, C> EntityStore<E, C>
where
    C: BackingCollection<EntityId, E>,
{
    pub fn new(ids: Arc<dyn EntityIdSource>, collection: C) -> Self {
        Self {
            ids,
            collection,
            pending: None,
        }
    }

    pub fn exists(&self, id: &EntityId) -> bool {
        self.is_pending_id(id) || self.collection.contains(id)
    }

    pub fn get(&self, id: &EntityId) -> Result<&E, StoreError> {
        match &self.pending {
            Some(pending) if pending.id == *id => Ok(&pending.entity),
            _ => self.collection.get(id).ok_or(StoreError::NotFound(*id)),
        }
    }

    /// Applies `change` to the entity with the given id.
    ///
    /// A committed entity is always written back, even when `change` fails,
    /// so the collection's change tracking sees whatever was mutated.
    pub fn apply<R, CE, F>(&mut self, id: &EntityId, change: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut E) -> Result<R, CE>,
        CE: Display,
    {
        if let Some(pending) = self.pending.as_mut().filter(|p| p.id == *id) {
            return change(&mut pending.entity).map_err(|e| StoreError::ChangeFailed {
                id: *id,
                reason: e.to_string(),
            });
        }

        let mut entity = self
            .collection
            .get_for_modify(id)
            .ok_or(StoreError::NotFound(*id))?;
        let outcome = change(&mut entity);
        self.collection.replace(*id, entity);
        outcome.map_err(|e| StoreError::ChangeFailed {
            id: *id,
            reason: e.to_string(),
        })
    }

    /// Allocates an id for a creation sponsored by `sponsor`.
    pub fn allocate_id(&self, sponsor: &EntityId) -> Result<EntityId, StoreError> {
        if let Some(pending) = &self.pending {
            return Err(StoreError::CreationAlreadyPending(pending.id));
        }
        Ok(self.ids.new_entity_id(sponsor))
    }

    /// Installs `entity` as the pending creation under an id from
    /// [`Self::allocate_id`].
    pub fn begin_creation(&mut self, id: EntityId, entity: E) -> Result<(), StoreError> {
        if let Some(pending) = &self.pending {
            return Err(StoreError::CreationAlreadyPending(pending.id));
        }
        self.pending = Some(PendingCreation { id, entity });
        Ok(())
    }

    /// Moves the pending entity into the committed collection.
    pub fn commit_creation(&mut self) -> Result<EntityId, StoreError> {
        let PendingCreation { id, entity } =
            self.pending.take().ok_or(StoreError::NoCreationPending)?;
        self.collection.put(id, entity);
        Ok(id)
    }

    /// Discards the pending entity and reclaims its id.
    pub fn rollback_creation(&mut self) -> Result<PendingCreation<E>, StoreError> {
        let pending = self.pending.take().ok_or(StoreError::NoCreationPending)?;
        self.ids.reclaim_last_id();
        Ok(pending)
    }

    pub fn is_creation_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingCreation<E>> {
        self.pending.as_ref()
    }

    /// Removes a committed entity. The pending creation is left in place;
    /// only rollback discards it.
    pub fn remove(&mut self, id: &EntityId) -> Result<Option<E>, StoreError> {
        if self.is_pending_id(id) {
            return Ok(None);
        }
        self.collection
            .remove(id)
            .map(Some)
            .ok_or(StoreError::NotFound(*id))
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    fn is_pending_id(&self, id: &EntityId) -> bool {
        self.pending.as_ref().is_some_and(|p| p.id == *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryCollection, SequentialIdSource};

    type Store = EntityStore<String, InMemoryCollection<EntityId, String>>;

    const SPONSOR: EntityId = EntityId::new(0, 0, 2);

    fn store() -> Store {
        EntityStore::new(
            Arc::new(SequentialIdSource::starting_at(1001)),
            InMemoryCollection::new(),
        )
    }

    fn create(store: &mut Store, value: &str) -> EntityId {
        let id = store.allocate_id(&SPONSOR).unwrap();
        store.begin_creation(id, value.to_string()).unwrap();
        id
    }

    #[test]
    fn test_pending_visible_only_by_id() {
        let mut store = store();
        let id = create(&mut store, "draft");

        assert!(store.is_creation_pending());
        assert!(store.exists(&id));
        assert_eq!(store.get(&id).unwrap(), "draft");
        assert_eq!(store.collection().len(), 0);
    }

    #[test]
    fn test_commit_moves_into_collection() {
        let mut store = store();
        let id = create(&mut store, "draft");

        assert_eq!(store.commit_creation().unwrap(), id);
        assert!(!store.is_creation_pending());
        assert_eq!(store.collection().get(&id).map(String::as_str), Some("draft"));
    }

    #[test]
    fn test_rollback_reclaims_id() {
        let mut store = store();
        let first = create(&mut store, "draft");
        store.rollback_creation().unwrap();

        assert!(!store.exists(&first));
        assert_eq!(create(&mut store, "again"), first);
    }

    #[test]
    fn test_commit_or_rollback_without_pending_fails() {
        let mut store = store();
        assert_eq!(store.commit_creation(), Err(StoreError::NoCreationPending));
        assert_eq!(
            store.rollback_creation().map(|p| p.id),
            Err(StoreError::NoCreationPending)
        );
    }

    #[test]
    fn test_second_creation_rejected() {
        let mut store = store();
        let id = create(&mut store, "first");
        assert_eq!(
            store.allocate_id(&SPONSOR),
            Err(StoreError::CreationAlreadyPending(id))
        );
        assert_eq!(
            store.begin_creation(EntityId::new(0, 0, 9), "second".to_string()),
            Err(StoreError::CreationAlreadyPending(id))
        );
    }

    #[test]
    fn test_apply_writes_back_committed() {
        let mut store = store();
        let id = create(&mut store, "v1");
        store.commit_creation().unwrap();
        let before = store.collection().modifications();

        store
            .apply(&id, |s| {
                s.push_str("+v2");
                Ok::<_, String>(())
            })
            .unwrap();

        assert_eq!(store.get(&id).unwrap(), "v1+v2");
        assert_eq!(store.collection().modifications(), before + 1);
    }

    #[test]
    fn test_apply_failure_is_change_failed() {
        let mut store = store();
        let id = create(&mut store, "v1");
        store.commit_creation().unwrap();

        let result = store.apply(&id, |s| {
            s.push('!');
            Err::<(), _>("bad mutation")
        });

        assert!(matches!(result, Err(StoreError::ChangeFailed { .. })));
        assert_eq!(store.get(&id).unwrap(), "v1!");
    }

    #[test]
    fn test_apply_pending_mutates_provisional() {
        let mut store = store();
        let id = create(&mut store, "p");
        store
            .apply(&id, |s| {
                s.push('q');
                Ok::<_, String>(())
            })
            .unwrap();
        assert_eq!(store.get(&id).unwrap(), "pq");
        assert_eq!(store.collection().modifications(), 0);
    }

    #[test]
    fn test_missing_id() {
        let mut store = store();
        let missing = EntityId::new(0, 0, 404);
        assert_eq!(store.get(&missing), Err(StoreError::NotFound(missing)));
        assert_eq!(store.remove(&missing), Err(StoreError::NotFound(missing)));
        assert!(!store.exists(&missing));
    }
}
