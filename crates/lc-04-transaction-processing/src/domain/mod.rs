//! # Domain Layer - Transaction Processing
//!
//! ## Components
//!
//! - `clock`: consensus watermark, midnight rates, ISS cooldown
//! - `context`: per-transaction state and the transition environment
//! - `errors`: [`LedgerError`] and [`ProcessingError`]
//! - `fees`: [`FeeObject`] and the charging context
//! - `gate`: sanity and due-diligence checks
//! - `history`: transaction-id histories for duplicate classification
//! - `ledger`: accounts with a per-transaction change set
//! - `sig_requirements`: required keys and signature rationalization

pub mod clock;
pub mod context;
pub mod errors;
pub mod fees;
pub mod gate;
pub mod history;
pub mod ledger;
pub mod sig_requirements;

pub use clock::{ConsensusClock, IssEventInfo, IssEventStatus, SharedIssEventInfo};
pub use context::{FreezeWindow, HandleEnv, NetworkState, TransactionContext};
pub use errors::{LedgerError, ProcessingError};
pub use fees::{ChargingContext, FeeObject};
pub use gate::{SanityFailure, TransactionGate};
pub use history::{DuplicateClassification, TxnHistories, TxnIdRecentHistory};
pub use ledger::{Account, AccountLedger, ChangeSet};
pub use sig_requirements::{
    is_terminal_rationalization_error, rationalize, Rationalization, ScheduledScope,
};
