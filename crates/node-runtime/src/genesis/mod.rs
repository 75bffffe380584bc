//! # Genesis Module
//!
//! Builds the initial account ledger and running-hash seed from
//! configuration.
//!
//! ## Requirements
//!
//! - Account numbers are unique and the total supply fits in a `u64`
//! - The funding account and every member's node account exist
//! - Accounts configured without a public key can receive but never sign

pub mod builder;

pub use builder::{Genesis, GenesisAccount, GenesisBuilder, GenesisConfig, GenesisError};
