//! # Domain Layer - Signature Witness
//!
//! - `entities`: verification outcomes and the engine's verdict
//! - `activation`: structured key activation
//! - `expansion`: public-key prefix expansion
//! - `witness`: the scheduled-signature witness engine

pub mod activation;
pub mod entities;
pub mod expansion;
pub mod witness;

pub use activation::{are_all_active, is_key_active};
pub use entities::*;
pub use expansion::{expand, ExpandedSig};
pub use witness::witness_in_scope;
