//! # Transaction Id Histories
//!
//! Recently handled transaction ids, used to classify duplicates.
//!
//! | Classification | Condition |
//! |----------------|-----------|
//! | `NodeDuplicate` | the submitting member already submitted this id |
//! | `Duplicate` | another member's submission of this id was classifiable |
//! | `BelievedUnique` | neither |
//!
//! Records that failed the node's own due diligence (`INVALID_NODE_ACCOUNT`,
//! `INVALID_PAYER_SIGNATURE`) say nothing about the payer, so they only count
//! against the member that submitted them.

use shared_types::{MemberId, ResponseCode, Timestamp, TransactionId};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateClassification {
    BelievedUnique,
    Duplicate,
    NodeDuplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observation {
    member: MemberId,
    consensus_time: Timestamp,
    classifiable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TxnIdRecentHistory {
    observations: Vec<Observation>,
}

fn is_classifiable(status: ResponseCode) -> bool {
    !matches!(
        status,
        ResponseCode::InvalidNodeAccount | ResponseCode::InvalidPayerSignature
    )
}

impl TxnIdRecentHistory {
    pub fn observe(&mut self, member: MemberId, status: ResponseCode, consensus_time: Timestamp) {
        self.observations.push(Observation {
            member,
            consensus_time,
            classifiable: is_classifiable(status),
        });
    }

    pub fn current_duplicity_for(&self, member: MemberId) -> DuplicateClassification {
        if self.observations.iter().any(|o| o.member == member) {
            DuplicateClassification::NodeDuplicate
        } else if self.observations.iter().any(|o| o.classifiable) {
            DuplicateClassification::Duplicate
        } else {
            DuplicateClassification::BelievedUnique
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    fn forget_older_than(&mut self, cutoff_secs: i64) {
        self.observations
            .retain(|o| o.consensus_time.seconds > cutoff_secs);
    }
}

pub struct TxnHistories {
    ttl_secs: i64,
    histories: HashMap<TransactionId, TxnIdRecentHistory>,
    /// `(expiry second, id)` in observation order.
    expiries: VecDeque<(i64, TransactionId)>,
}

impl TxnHistories {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl_secs,
            histories: HashMap::new(),
            expiries: VecDeque::new(),
        }
    }

    pub fn get(&self, id: &TransactionId) -> Option<&TxnIdRecentHistory> {
        self.histories.get(id)
    }

    pub fn duplicity_of(&self, id: &TransactionId, member: MemberId) -> DuplicateClassification {
        self.histories
            .get(id)
            .map_or(DuplicateClassification::BelievedUnique, |h| {
                h.current_duplicity_for(member)
            })
    }

    pub fn observe(
        &mut self,
        id: TransactionId,
        member: MemberId,
        status: ResponseCode,
        consensus_time: Timestamp,
    ) {
        self.histories
            .entry(id)
            .or_default()
            .observe(member, status, consensus_time);
        self.expiries
            .push_back((consensus_time.seconds.saturating_add(self.ttl_secs), id));
    }

    /// Drops observations at least `ttl_secs` old. Returns how many ids were
    /// forgotten entirely.
    pub fn purge_expired_records(&mut self, now: &Timestamp) -> usize {
        let cutoff = now.seconds.saturating_sub(self.ttl_secs);
        let mut forgotten = 0;
        while let Some((expiry, _)) = self.expiries.front() {
            if *expiry > now.seconds {
                break;
            }
            let Some((_, id)) = self.expiries.pop_front() else {
                break;
            };
            if let Some(history) = self.histories.get_mut(&id) {
                history.forget_older_than(cutoff);
                if history.is_empty() {
                    self.histories.remove(&id);
                    forgotten += 1;
                }
            }
        }
        forgotten
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}
