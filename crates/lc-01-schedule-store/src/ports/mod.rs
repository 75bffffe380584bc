//! # Ports
//!
//! - `inbound`: [`ScheduleStoreApi`](inbound::ScheduleStoreApi), the store
//!   surface transition logic drives
//! - `outbound`: collection, id allocation and account lookup

pub mod inbound;
pub mod outbound;
