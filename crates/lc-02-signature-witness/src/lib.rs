//! # Signature Witness Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Turns a signature map into verified, key-attributed signatures and decides
//! how a schedule operation responds to the signatures in its scope.
//!
//! ## Flow
//!
//! ```text
//! SignatureMap ──expand──→ [ExpandedSig] ──verify──→ VerifiedSigs
//!                    │                        │
//!                    └─ KEY_PREFIX_MISMATCH   └─ rayon when len ≥ parallel_threshold
//!
//! VerifiedSigs (scheduled scope) ──witness_in_scope──→ SigningOutcome { status, ready }
//! ```
//!
//! Key activation (`is_key_active`) evaluates structured keys against any
//! predicate over Ed25519 leaves; the pipeline uses it for both payer checks
//! and schedule readiness.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ - DalekVerifier                                      │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - SignatureRationalizationApi                │
//! │  ports/outbound.rs - WitnessTarget, Ed25519Verifier             │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/ - expansion, activation, witness engine                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::DalekVerifier;
pub use config::VerificationConfig;
pub use domain::*;
pub use ports::inbound::SignatureRationalizationApi;
pub use ports::outbound::{Ed25519Verifier, WitnessTarget};
pub use service::SignatureRationalizer;
