//! # Adapters
//!
//! Default collaborators for a statically configured network:
//!
//! - `fees`: tinycent [`FeeSchedule`] and [`StandardChargingPolicy`]
//! - `network`: address book, validator, system policies, exchange rates

mod fees;
mod network;

pub use fees::{FeeSchedule, StandardChargingPolicy};
pub use network::{
    ContextValidator, FixedExchangeRates, StaticAddressBook, SystemAccountPolicies,
    MAX_SYSTEM_ACCOUNT_NUM,
};
