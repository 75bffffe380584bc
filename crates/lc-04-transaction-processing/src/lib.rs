//! # Transaction Processing Subsystem
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Handles consensus-ordered transactions one at a time: gates them, charges
//! fees, checks signatures, dispatches to per-function business logic, and
//! streams one record per handled transaction. Ready scheduled transactions
//! run immediately after the transaction that made them ready.
//!
//! ## Flow
//!
//! ```text
//! Platform ──incorporate_consensus_txn──→ TransactionProcessor
//!                                             │
//!        ┌──────────────┬──────────────┬──────┴───────┬──────────────┐
//!        ▼              ▼              ▼              ▼              ▼
//!  TransactionGate  Rationalizer  ChargingPolicy  TransitionLogic  RecordStream
//!   (sanity, due     (Subsystem 2)                 (ScheduleStore,  (Subsystem 3)
//!    diligence)                                     Subsystem 1)
//! ```
//!
//! | Outcome | Status | Fee | Record |
//! |---------|--------|-----|--------|
//! | unparseable, non-increasing time, zero stake | none | none | no |
//! | due diligence failure | gate's code | submitting node | yes |
//! | duplicate | `DUPLICATE_TRANSACTION` | payer, node + network | yes |
//! | otherwise | charging, signature or logic status | payer | yes |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs   - TransactionProcessor                            │
//! │  forensics.rs - IssListener, StateView                          │
//! │  logic/       - transfer, schedule create/sign/delete, freeze   │
//! │  adapters/    - FeeSchedule, StandardChargingPolicy, address    │
//! │                 book, validator, system policies, rates         │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - ConsensusTxnHandler                        │
//! │  ports/outbound.rs - FeeCalculator, ChargingPolicy,             │
//! │                      TransitionLogic, SystemOpPolicies,         │
//! │                      AddressBook, Validator, ExchangeRateSource │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/ - AccountLedger, ConsensusClock, TxnHistories,         │
//! │            TransactionGate, TransactionContext, rationalize     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod forensics;
pub mod logic;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use config::ProcessingConfig;
pub use domain::*;
pub use forensics::{IssListener, IssReport, StateRootHashes, StateView};
pub use logic::TransitionLogicRegistry;
pub use ports::inbound::ConsensusTxnHandler;
pub use ports::outbound::{
    AddressBook, ChargingPolicy, ExchangeRateSource, FeeCalculator, NodeAddress,
    SystemOpPolicies, TransitionLogic, Validator,
};
pub use service::TransactionProcessor;
