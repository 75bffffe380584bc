//! # Transition Logic
//!
//! Business logic per transaction function, looked up through a registry
//! populated at construction.
//!
//! | Function | Logic |
//! |----------|-------|
//! | `CryptoTransfer` | [`CryptoTransferLogic`] |
//! | `ScheduleCreate` | [`ScheduleCreateLogic`] |
//! | `ScheduleSign` | [`ScheduleSignLogic`] |
//! | `ScheduleDelete` | [`ScheduleDeleteLogic`] |
//! | `Freeze` | [`FreezeLogic`] |

mod crypto_transfer;
mod freeze;
mod schedule_create;
mod schedule_delete;
mod schedule_sign;
mod schedule_witness;

pub use crypto_transfer::CryptoTransferLogic;
pub use freeze::FreezeLogic;
pub use schedule_create::ScheduleCreateLogic;
pub use schedule_delete::ScheduleDeleteLogic;
pub use schedule_sign::ScheduleSignLogic;
pub use schedule_witness::{execute_ready, witness_scope, ScheduleWitness};

use crate::ports::outbound::TransitionLogic;
use shared_types::{Functionality, TransactionBody};
use std::collections::BTreeMap;
use tracing::debug;

/// Transition logics keyed by function. Several logics may share a
/// function; the first whose `applies_to` accepts the body wins.
#[derive(Default)]
pub struct TransitionLogicRegistry {
    logics: BTreeMap<Functionality, Vec<Box<dyn TransitionLogic>>>,
}

impl TransitionLogicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in logic.
    pub fn standard(max_memo_utf8_bytes: usize) -> Self {
        let mut registry = Self::new();
        registry.register(Functionality::CryptoTransfer, Box::new(CryptoTransferLogic));
        registry.register(
            Functionality::ScheduleCreate,
            Box::new(ScheduleCreateLogic::new(max_memo_utf8_bytes)),
        );
        registry.register(Functionality::ScheduleSign, Box::new(ScheduleSignLogic));
        registry.register(Functionality::ScheduleDelete, Box::new(ScheduleDeleteLogic));
        registry.register(Functionality::Freeze, Box::new(FreezeLogic));
        registry
    }

    pub fn register(&mut self, function: Functionality, logic: Box<dyn TransitionLogic>) {
        debug!(function = %function, "Registering transition logic");
        self.logics.entry(function).or_default().push(logic);
    }

    pub fn lookup_for(
        &self,
        function: Functionality,
        body: &TransactionBody,
    ) -> Option<&dyn TransitionLogic> {
        self.logics
            .get(&function)?
            .iter()
            .find(|logic| logic.applies_to(body))
            .map(Box::as_ref)
    }

    pub fn is_registered(&self, function: Functionality) -> bool {
        self.logics.get(&function).is_some_and(|l| !l.is_empty())
    }
}
