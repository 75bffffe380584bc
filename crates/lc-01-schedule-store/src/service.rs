//! # Schedule Store Service
//!
//! Specializes the managing store for scheduled transactions:
//!
//! - dedup index from [`CompositeKey`] to committed id, rebuilt once at
//!   construction and maintained incrementally afterwards
//! - expiry queue fed on every commit
//! - delete / execute / expire removal paths

use crate::config::ScheduleStoreConfig;
use crate::domain::composite_key::CompositeKey;
use crate::domain::entities::Schedule;
use crate::domain::entity_store::EntityStore;
use crate::domain::errors::StoreError;
use crate::domain::expiry::ExpiringEntities;
use crate::ports::inbound::{CreationResult, NewSchedule, ScheduleStoreApi};
use crate::ports::outbound::{AccountLookup, BackingCollection, EntityIdSource};
use shared_types::{AccountId, EntityId, Key, ResponseCode, ScheduleId, Timestamp};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Managing store for schedules.
pub struct ScheduleStore<C> {
    config: ScheduleStoreConfig,
    store: EntityStore<Schedule, C>,
    tx_to_entity_id: HashMap<CompositeKey, EntityId>,
    expiries: ExpiringEntities,
}

impl<C> ScheduleStore<C>
where
    C: BackingCollection<EntityId, Schedule>,
{
    /// Wraps an existing collection, indexing every schedule already in it.
    pub fn new(config: ScheduleStoreConfig, ids: Arc<dyn EntityIdSource>, collection: C) -> Self {
        let mut tx_to_entity_id = HashMap::new();
        let mut expiries = ExpiringEntities::new();
        collection.for_each(&mut |id, schedule| {
            tx_to_entity_id.insert(CompositeKey::from_schedule(schedule), *id);
            expiries.track(*id, schedule.expiration_time_secs());
        });

        if !tx_to_entity_id.is_empty() {
            info!(
                schedules = tx_to_entity_id.len(),
                "Rebuilt schedule dedup index"
            );
        }

        Self {
            config,
            store: EntityStore::new(ids, collection),
            tx_to_entity_id,
            expiries,
        }
    }

    pub fn config(&self) -> &ScheduleStoreConfig {
        &self.config
    }

    /// Number of committed schedules.
    pub fn len(&self) -> usize {
        self.store.collection().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn collection(&self) -> &C {
        self.store.collection()
    }

    /// Number of schedules awaiting expiry.
    pub fn tracked_expiries(&self) -> usize {
        self.expiries.len()
    }

    /// Removes a committed schedule and its dedup entry. A pending creation
    /// is only ever removed by [`ScheduleStoreApi::rollback_creation`]; for
    /// its id this reports `OK` and leaves the creation in place.
    fn remove_schedule(&mut self, id: &ScheduleId) -> ResponseCode {
        let entity = id.entity();
        let key = match self.store.get(&entity) {
            Ok(schedule) => CompositeKey::from_schedule(schedule),
            Err(_) => return ResponseCode::InvalidScheduleId,
        };
        if let Err(e) = self.store.remove(&entity) {
            warn!(schedule_id = %id, error = %e, "Schedule removal failed");
            return ResponseCode::FailInvalid;
        }
        self.tx_to_entity_id.remove(&key);
        ResponseCode::Ok
    }
}

fn account_check(
    accounts: &dyn AccountLookup,
    id: &AccountId,
    failure: ResponseCode,
) -> ResponseCode {
    if accounts.is_usable(id) {
        ResponseCode::Ok
    } else {
        failure
    }
}

impl<C> ScheduleStoreApi for ScheduleStore<C>
where
    C: BackingCollection<EntityId, Schedule>,
{
    fn exists(&self, id: &ScheduleId) -> bool {
        self.store.exists(&id.entity())
    }

    fn get(&self, id: &ScheduleId) -> Result<&Schedule, StoreError> {
        self.store.get(&id.entity())
    }

    fn apply(
        &mut self,
        id: &ScheduleId,
        change: &mut dyn FnMut(&mut Schedule) -> Result<(), String>,
    ) -> Result<(), StoreError> {
        self.store.apply(&id.entity(), |schedule| change(schedule))
    }

    fn create_provisionally(
        &mut self,
        accounts: &dyn AccountLookup,
        request: NewSchedule,
        consensus_time: Timestamp,
    ) -> Result<CreationResult, StoreError> {
        if let Some(pending) = self.store.pending() {
            return Err(StoreError::CreationAlreadyPending(pending.id));
        }

        let validity = account_check(
            accounts,
            &request.scheduling_account,
            ResponseCode::InvalidScheduleAccountId,
        );
        if validity != ResponseCode::Ok {
            return Ok(CreationResult::failure(validity));
        }
        let validity = account_check(accounts, &request.payer, ResponseCode::InvalidSchedulePayerId);
        if validity != ResponseCode::Ok {
            return Ok(CreationResult::failure(validity));
        }

        let id = self
            .store
            .allocate_id(&request.scheduling_account.entity())?;
        let schedule = Schedule::new(
            request.body_bytes,
            request.scheduling_account,
            request.scheduling_txn_valid_start,
        )
        .with_payer(request.payer)
        .with_admin_key(request.admin_key)
        .with_memo(request.memo)
        .with_expiry(consensus_time.seconds + self.config.scheduled_tx_expiry_secs);
        self.store.begin_creation(id, schedule)?;

        debug!(schedule_id = %id, "Schedule created provisionally");
        Ok(CreationResult::success(ScheduleId(id)))
    }

    fn commit_creation(&mut self) -> Result<ScheduleId, StoreError> {
        let id = self.store.commit_creation()?;
        let schedule = self.store.get(&id)?;
        let key = CompositeKey::from_schedule(schedule);
        let expiry = schedule.expiration_time_secs();

        self.tx_to_entity_id.insert(key, id);
        self.expiries.track(id, expiry);

        debug!(schedule_id = %id, expiry, "Schedule committed");
        Ok(ScheduleId(id))
    }

    fn rollback_creation(&mut self) -> Result<(), StoreError> {
        let discarded = self.store.rollback_creation()?;
        debug!(schedule_id = %discarded.id, "Schedule creation rolled back");
        Ok(())
    }

    fn is_creation_pending(&self) -> bool {
        self.store.is_creation_pending()
    }

    fn lookup_schedule_id(
        &self,
        body_bytes: &[u8],
        payer: AccountId,
        admin_key: Option<&Key>,
        memo: &str,
    ) -> Option<ScheduleId> {
        let key_to_check_for = CompositeKey::new(body_bytes, payer, admin_key, memo);

        if let Some(pending) = self.store.pending() {
            if CompositeKey::from_schedule(&pending.entity) == key_to_check_for {
                return Some(ScheduleId(pending.id));
            }
        }

        self.tx_to_entity_id
            .get(&key_to_check_for)
            .copied()
            .map(ScheduleId)
    }

    fn delete(&mut self, id: &ScheduleId) -> ResponseCode {
        match self.store.get(&id.entity()) {
            Err(_) => return ResponseCode::InvalidScheduleId,
            Ok(schedule) if schedule.admin_key().is_none() => {
                return ResponseCode::ScheduleIsImmutable
            }
            Ok(_) => {}
        }
        let status = self.remove_schedule(id);
        if status.is_ok() {
            debug!(schedule_id = %id, "Schedule deleted");
        }
        status
    }

    fn mark_as_executed(&mut self, id: &ScheduleId) -> ResponseCode {
        let status = self.remove_schedule(id);
        if status.is_ok() {
            debug!(schedule_id = %id, "Schedule executed");
        }
        status
    }

    fn expire(&mut self, id: EntityId) -> ResponseCode {
        self.mark_as_executed(&ScheduleId(id))
    }

    fn purge_expired_entities_at(&mut self, now_secs: i64) -> usize {
        let mut purged = 0;
        for id in self.expiries.drain_expired(now_secs) {
            // Executed and deleted schedules leave stale queue entries.
            if self.store.exists(&id) && self.expire(id).is_ok() {
                debug!(schedule_id = %id, now_secs, "Schedule expired");
                purged += 1;
            }
        }
        purged
    }

    fn root_hash(&self) -> [u8; 32] {
        self.store.collection().root_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryCollection, KnownAccounts, SequentialIdSource};

    fn accounts() -> KnownAccounts {
        KnownAccounts::new([AccountId::from_num(2), AccountId::from_num(1001)])
    }

    fn request(admin: bool) -> NewSchedule {
        NewSchedule {
            body_bytes: vec![1, 2, 3],
            payer: AccountId::from_num(2),
            scheduling_account: AccountId::from_num(1001),
            scheduling_txn_valid_start: Timestamp::new(50, 0),
            admin_key: admin.then(|| Key::Ed25519([9u8; 32])),
            memo: "rent".to_string(),
        }
    }

    fn store() -> ScheduleStore<InMemoryCollection<EntityId, Schedule>> {
        ScheduleStore::new(
            ScheduleStoreConfig::default(),
            Arc::new(SequentialIdSource::starting_at(2001)),
            InMemoryCollection::new(),
        )
    }

    #[test]
    fn test_create_sets_expiry_from_consensus_time() {
        let mut store = store();
        let result = store
            .create_provisionally(&accounts(), request(true), Timestamp::new(100, 7))
            .unwrap();
        let id = result.created.unwrap();

        assert_eq!(result.status, ResponseCode::Ok);
        assert_eq!(store.get(&id).unwrap().expiration_time_secs(), 1900);
        assert!(store.is_creation_pending());
    }

    #[test]
    fn test_invalid_accounts_allocate_nothing() {
        let mut store = store();
        let mut bad = request(true);
        bad.scheduling_account = AccountId::from_num(77);
        let result = store
            .create_provisionally(&accounts(), bad, Timestamp::new(100, 0))
            .unwrap();
        assert_eq!(result, CreationResult::failure(ResponseCode::InvalidScheduleAccountId));

        let mut bad = request(true);
        bad.payer = AccountId::from_num(78);
        let result = store
            .create_provisionally(&accounts(), bad, Timestamp::new(100, 0))
            .unwrap();
        assert_eq!(result, CreationResult::failure(ResponseCode::InvalidSchedulePayerId));
        assert!(!store.is_creation_pending());

        let ok = store
            .create_provisionally(&accounts(), request(true), Timestamp::new(100, 0))
            .unwrap();
        assert_eq!(ok.created, Some(ScheduleId::from_num(2001)));
    }

    #[test]
    fn test_commit_tracks_expiry_and_index() {
        let mut store = store();
        let req = request(false);
        store
            .create_provisionally(&accounts(), req.clone(), Timestamp::new(100, 0))
            .unwrap();
        let id = store.commit_creation().unwrap();

        assert_eq!(store.tracked_expiries(), 1);
        assert_eq!(
            store.lookup_schedule_id(&req.body_bytes, req.payer, None, &req.memo),
            Some(id)
        );
    }

    #[test]
    fn test_purge_expires_due_schedules_only() {
        let mut store = store();
        store
            .create_provisionally(&accounts(), request(false), Timestamp::new(100, 0))
            .unwrap();
        let id = store.commit_creation().unwrap();

        assert_eq!(store.purge_expired_entities_at(1899), 0);
        assert!(store.exists(&id));
        assert_eq!(store.purge_expired_entities_at(1900), 1);
        assert!(!store.exists(&id));
    }

    #[test]
    fn test_purge_ignores_already_executed() {
        let mut store = store();
        store
            .create_provisionally(&accounts(), request(false), Timestamp::new(100, 0))
            .unwrap();
        let id = store.commit_creation().unwrap();
        assert_eq!(store.mark_as_executed(&id), ResponseCode::Ok);
        assert_eq!(store.purge_expired_entities_at(5000), 0);
    }

    #[test]
    fn test_create_while_pending_is_an_error() {
        let mut store = store();
        store
            .create_provisionally(&accounts(), request(true), Timestamp::new(100, 0))
            .unwrap();
        assert!(matches!(
            store.create_provisionally(&accounts(), request(false), Timestamp::new(100, 0)),
            Err(StoreError::CreationAlreadyPending(_))
        ));
    }
}
