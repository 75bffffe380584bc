//! # ISS Forensics
//!
//! Reaction to an inconsistent state signature (ISS) reported by the
//! platform. Detection happens outside this crate; the listener only raises
//! the shared alert and, for the configured number of rounds, logs the root
//! hashes of the local state for comparison with other replicas.

use crate::domain::clock::SharedIssEventInfo;
use crate::domain::errors::ProcessingError;
use shared_crypto::Sha384Digest;
use shared_types::{MemberId, Timestamp};
use tracing::{error, warn};

/// Root hashes of the state collections at the end of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRootHashes {
    pub accounts: [u8; 32],
    pub schedules: [u8; 32],
    /// Running hash of the record stream.
    pub running_hash: Sha384Digest,
}

/// Read access to the state a signed-state round covers.
pub trait StateView {
    fn root_hashes(&self) -> Result<StateRootHashes, ProcessingError>;
}

/// An ISS report from the platform.
#[derive(Debug, Clone, Copy)]
pub struct IssReport<'a> {
    pub round: u64,
    pub self_id: MemberId,
    pub other_id: MemberId,
    pub consensus_time: Timestamp,
    /// The other replica's signature over its state hash.
    pub sig: &'a [u8],
    /// The other replica's state hash.
    pub hash: &'a [u8],
}

pub struct IssListener {
    iss: SharedIssEventInfo,
}

impl IssListener {
    pub fn new(iss: SharedIssEventInfo) -> Self {
        Self { iss }
    }

    pub fn notify_error(&self, report: &IssReport<'_>, state: &dyn StateView) {
        let should_dump = {
            let mut iss = self.iss.lock();
            iss.alert(report.consensus_time);
            let dump = iss.should_dump_this_round();
            if dump {
                iss.decrement_rounds_to_dump();
            }
            dump
        };
        if !should_dump {
            return;
        }

        match state.root_hashes() {
            Ok(hashes) => error!(
                round = report.round,
                self_id = report.self_id,
                other_id = report.other_id,
                sig = %hex::encode(report.sig),
                hash = %hex::encode(report.hash),
                accounts_root_hash = %hex::encode(hashes.accounts),
                schedules_root_hash = %hex::encode(hashes.schedules),
                running_hash = %hex::encode(hashes.running_hash),
                "Received a signed state from a replica differing from the local signed state"
            ),
            Err(e) => warn!(
                round = report.round,
                self_id = report.self_id,
                other_id = report.other_id,
                error = %e,
                "Received a signed state differing from the local signed state; could not provide all details!"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::{IssEventInfo, IssEventStatus};
    use crate::domain::errors::LedgerError;
    use std::cell::Cell;

    struct CountingView {
        calls: Cell<usize>,
        fail: bool,
    }

    impl StateView for CountingView {
        fn root_hashes(&self) -> Result<StateRootHashes, ProcessingError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(LedgerError::NoActiveTransaction.into());
            }
            Ok(StateRootHashes {
                accounts: [1; 32],
                schedules: [2; 32],
                running_hash: [3; 48],
            })
        }
    }

    fn report(round: u64) -> IssReport<'static> {
        IssReport {
            round,
            self_id: 0,
            other_id: 1,
            consensus_time: Timestamp::of_seconds(round as i64),
            sig: &[0xab; 4],
            hash: &[0xcd; 4],
        }
    }

    #[test]
    fn test_dumps_only_configured_rounds() {
        let iss = IssEventInfo::shared(2);
        let listener = IssListener::new(iss.clone());
        let view = CountingView {
            calls: Cell::new(0),
            fail: false,
        };

        for round in 1..=4 {
            listener.notify_error(&report(round), &view);
        }
        assert_eq!(view.calls.get(), 2);
        assert_eq!(iss.lock().status(), IssEventStatus::OngoingIss);
        assert_eq!(
            iss.lock().consensus_time_of_recent_alert(),
            Some(Timestamp::of_seconds(4))
        );
    }

    #[test]
    fn test_failed_view_still_alerts() {
        let iss = IssEventInfo::shared(1);
        let listener = IssListener::new(iss.clone());
        let view = CountingView {
            calls: Cell::new(0),
            fail: true,
        };
        listener.notify_error(&report(7), &view);
        assert_eq!(view.calls.get(), 1);
        assert_eq!(iss.lock().status(), IssEventStatus::OngoingIss);
        assert!(!iss.lock().should_dump_this_round());
    }
}
