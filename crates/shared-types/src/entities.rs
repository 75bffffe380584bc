//! # Core Ledger Entities
//!
//! Identity and time primitives shared across subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: [`EntityId`], [`AccountId`], [`ScheduleId`]
//! - **Time**: [`Timestamp`] (consensus time with nanosecond precision)
//! - **Rates**: [`ExchangeRate`], [`ExchangeRateSet`]

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A `shard.realm.num` triple identifying any ledger entity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl EntityId {
    /// The all-zero id, never assigned to a real entity.
    pub const MISSING: EntityId = EntityId::new(0, 0, 0);

    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    pub fn is_missing(&self) -> bool {
        *self == Self::MISSING
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

macro_rules! typed_entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
        )]
        pub struct $name(pub EntityId);

        impl $name {
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self(EntityId::new(shard, realm, num))
            }

            /// Id in shard 0, realm 0.
            pub const fn from_num(num: u64) -> Self {
                Self::new(0, 0, num)
            }

            pub fn entity(&self) -> EntityId {
                self.0
            }

            pub fn num(&self) -> u64 {
                self.0.num
            }
        }

        impl From<EntityId> for $name {
            fn from(id: EntityId) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

typed_entity_id!(
    /// Identifies a crypto account.
    AccountId
);

typed_entity_id!(
    /// Identifies a scheduled transaction entity.
    ScheduleId
);

/// Identifies a consensus participant (address book index).
pub type MemberId = u64;

// =============================================================================
// CLUSTER B: TIME
// =============================================================================

/// A consensus timestamp: seconds since the UNIX epoch plus nanoseconds.
///
/// Ordering is lexicographic on `(seconds, nanos)`, which matches the order of
/// the instants they denote because `nanos` is always normalised below 10^9.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self::from_nanos(seconds as i128 * NANOS_PER_SECOND + nanos as i128)
    }

    pub fn of_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    pub fn from_nanos(total: i128) -> Self {
        Self {
            seconds: total.div_euclid(NANOS_PER_SECOND) as i64,
            nanos: total.rem_euclid(NANOS_PER_SECOND) as u32,
        }
    }

    pub fn to_nanos(&self) -> i128 {
        self.seconds as i128 * NANOS_PER_SECOND + self.nanos as i128
    }

    /// Strictly later than `other`.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self > other
    }

    pub fn minus_nanos(&self, nanos: u64) -> Self {
        Self::from_nanos(self.to_nanos() - nanos as i128)
    }

    pub fn plus_nanos(&self, nanos: u64) -> Self {
        Self::from_nanos(self.to_nanos() + nanos as i128)
    }

    pub fn plus_seconds(&self, seconds: i64) -> Self {
        Self {
            seconds: self.seconds.saturating_add(seconds),
            nanos: self.nanos,
        }
    }

    /// The UTC calendar date this instant falls on.
    pub fn utc_date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.seconds, self.nanos).map(|dt| dt.date_naive())
    }

    /// True if both instants fall on the same UTC calendar day.
    pub fn in_same_utc_day(&self, other: &Timestamp) -> bool {
        match (self.utc_date(), other.utc_date()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

// =============================================================================
// CLUSTER C: EXCHANGE RATES
// =============================================================================

/// Conversion between the native currency and US cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub hbar_equiv: u32,
    pub cent_equiv: u32,
    /// Epoch second after which this rate should no longer be used.
    pub expiration_secs: i64,
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self {
            hbar_equiv: 1,
            cent_equiv: 12,
            expiration_secs: i64::MAX,
        }
    }
}

/// The current and next exchange rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExchangeRateSet {
    pub current: ExchangeRate,
    pub next: ExchangeRate,
}
