//! # Ports
//!
//! - `inbound`: [`RecordStream`](inbound::RecordStream)
//! - `outbound`: [`RecordSink`](outbound::RecordSink)

pub mod inbound;
pub mod outbound;
