//! # Node Runtime Library
//!
//! Hosts the ledger core as a process. The `main.rs` binary uses these
//! modules; they are public so the wiring can be tested end to end.
//!
//! ## Modules
//!
//! - `container/` - configuration and subsystem wiring
//! - `genesis/` - initial ledger from configuration
//! - `handlers/` - consensus event intake and delivery

pub mod container;
pub mod genesis;
pub mod handlers;

pub use container::{ContainerError, NodeConfig, NodeContainer};
pub use genesis::{Genesis, GenesisBuilder, GenesisConfig};
pub use handlers::{ConsensusEvent, DeliveryHandler, DeliveryStats};
