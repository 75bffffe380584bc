//! # Shared Types Crate
//!
//! Ledger entities, transaction envelopes and outcome types shared by every
//! subsystem of the transaction-handling core.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: ids, timestamps, keys and response codes are
//!   defined once here.
//! - **Immutable Envelopes**: a [`TxnAccessor`] is built once from wire bytes
//!   and never mutated while a transaction is processed.
//! - **Typed Parsing**: malformed bytes surface as [`ParseError`], never as
//!   panics.

pub mod accessor;
pub mod entities;
pub mod errors;
pub mod keys;
pub mod record;
pub mod response_codes;
pub mod transaction;

pub use accessor::{TxnAccessor, TxnHash};
pub use entities::*;
pub use errors::ParseError;
pub use keys::{Ed25519Key, Key};
pub use record::{TransactionReceipt, TransactionRecord};
pub use response_codes::ResponseCode;
pub use transaction::*;
