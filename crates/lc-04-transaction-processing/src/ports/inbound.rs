//! # Inbound Ports (Driving Ports / API)
//!
//! The consensus delivery surface.

use shared_types::{MemberId, Timestamp, TransactionRecord};

/// Consensus-ordered transaction intake.
///
/// Calls must be made sequentially, in consensus order. A single call
/// handles the delivered transaction plus any scheduled transaction it
/// triggers, and returns the records streamed for them in order (empty when
/// the transaction was dropped).
pub trait ConsensusTxnHandler {
    fn incorporate_consensus_txn(
        &mut self,
        signed_txn_bytes: &[u8],
        consensus_time: Timestamp,
        submitting_member: MemberId,
    ) -> Vec<TransactionRecord>;
}
