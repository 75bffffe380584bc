//! # Adapters
//!
//! In-memory implementations of the outbound ports, used by the node
//! runtime's genesis state and by tests.

mod memory;

pub use memory::{InMemoryCollection, KnownAccounts, SequentialIdSource};
