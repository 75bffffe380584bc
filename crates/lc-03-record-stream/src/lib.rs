//! # Record Stream Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Append-only stream of transaction records. Every appended record is
//! chained into a SHA-384 running hash:
//!
//! ```text
//! h₀ = seed
//! hₙ = SHA-384(hₙ₋₁ || SHA-384(bincode(recordₙ)))
//! ```
//!
//! The hash is advanced under the same lock as the append, so readers never
//! observe one without the other. Re-deriving the chain from the same records
//! with [`recompute_chain`] reproduces the same head.
//!
//! ## Sinks
//!
//! | Sink | Use |
//! |------|-----|
//! | [`InMemoryRecordSink`] | bounded recent-record buffer |
//! | [`RollingFileSink`] | JSON-lines files per `log_period_secs` of consensus time |

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryRecordSink, RollingFileSink};
pub use config::RecordStreamConfig;
pub use domain::*;
pub use ports::inbound::RecordStream;
pub use ports::outbound::RecordSink;
pub use service::RecordEmitter;
