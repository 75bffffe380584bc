//! # Domain Layer - Schedule Store
//!
//! ## Components
//!
//! - `entities`: [`Schedule`] and its witnessed signatories
//! - `composite_key`: dedup fingerprint for create-or-reuse
//! - `entity_store`: generic provisional/commit/rollback store
//! - `expiry`: expiry queue keyed by consensus second
//! - `errors`: [`StoreError`] enumeration

pub mod composite_key;
pub mod entities;
pub mod entity_store;
pub mod errors;
pub mod expiry;

pub use composite_key::CompositeKey;
pub use entities::Schedule;
pub use entity_store::{EntityStore, PendingCreation};
pub use errors::StoreError;
pub use expiry::ExpiringEntities;
