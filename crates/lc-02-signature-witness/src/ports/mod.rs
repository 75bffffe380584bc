//! # Ports
//!
//! - `inbound`: [`SignatureRationalizationApi`](inbound::SignatureRationalizationApi)
//! - `outbound`: [`WitnessTarget`](outbound::WitnessTarget),
//!   [`Ed25519Verifier`](outbound::Ed25519Verifier)

pub mod inbound;
pub mod outbound;
