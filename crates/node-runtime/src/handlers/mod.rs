//! # Event Handlers
//!
//! Intake and delivery of consensus-ordered transactions.

pub mod delivery;

pub use delivery::{
    read_events, ConsensusEvent, Delivery, DeliveryHandler, DeliveryStats, EventError,
};
