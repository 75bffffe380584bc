//! # Ports
//!
//! - `inbound`: [`ConsensusTxnHandler`](inbound::ConsensusTxnHandler)
//! - `outbound`: fees, charging, dispatch, address book, validation, rates

pub mod inbound;
pub mod outbound;
