//! # Schedule Store Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Holds scheduled transactions while their required signatures accumulate.
//! Creation is two-phase so that a schedule-create transaction which fails
//! after allocating an id leaves no trace.
//!
//! ## Lifecycle
//!
//! ```text
//! createProvisionally ──→ [PENDING] ──commit──→ [COMMITTED] ──delete──────→ [GONE]
//!                             │                      ├──markAsExecuted──→ [GONE]
//!                             └──rollback──→ ∅       └──expire──────────→ [GONE]
//! ```
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | At most one pending creation | `EntityStore::begin_creation` |
//! | Pending and committed never overlap | `EntityStore::commit_creation` takes the slot |
//! | Dedup index matches committed set | `ScheduleStore::commit_creation`, `remove_schedule` |
//! | Committed never returns to pending | no API moves entities back |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ - InMemoryCollection, SequentialIdSource, KnownAccounts │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - ScheduleStoreApi                           │
//! │  ports/outbound.rs - BackingCollection, EntityIdSource,         │
//! │                      AccountLookup                              │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/ - Schedule, CompositeKey, EntityStore, ExpiringEntities │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use config::ScheduleStoreConfig;
pub use domain::*;
pub use ports::inbound::{CreationResult, NewSchedule, ScheduleStoreApi};
pub use ports::outbound::{AccountLookup, BackingCollection, EntityIdSource};
pub use service::ScheduleStore;

/// Collection type used for schedules by the in-memory node.
pub type InMemorySchedules = InMemoryCollection<shared_types::EntityId, Schedule>;
