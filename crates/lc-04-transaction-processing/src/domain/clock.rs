//! # Consensus Clock
//!
//! Data-driven clock state advanced by every handled transaction:
//!
//! - last-handled consensus time (strictly increasing watermark)
//! - midnight exchange rates, replaced when a transaction lands on a new UTC day
//! - ISS alert status, relaxed once the reset period has passed

use parking_lot::Mutex;
use shared_types::{ExchangeRateSet, Timestamp};
use std::sync::Arc;

// =============================================================================
// ISS EVENT INFO
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssEventStatus {
    NoKnownIss,
    OngoingIss,
}

/// Inconsistent-state alert tracking, shared with the ISS listener.
#[derive(Debug, Clone)]
pub struct IssEventInfo {
    status: IssEventStatus,
    consensus_time_of_recent_alert: Option<Timestamp>,
    remaining_rounds_to_dump: u32,
    rounds_to_dump: u32,
}

pub type SharedIssEventInfo = Arc<Mutex<IssEventInfo>>;

impl IssEventInfo {
    pub fn new(rounds_to_dump: u32) -> Self {
        Self {
            status: IssEventStatus::NoKnownIss,
            consensus_time_of_recent_alert: None,
            remaining_rounds_to_dump: 0,
            rounds_to_dump,
        }
    }

    pub fn shared(rounds_to_dump: u32) -> SharedIssEventInfo {
        Arc::new(Mutex::new(Self::new(rounds_to_dump)))
    }

    pub fn status(&self) -> IssEventStatus {
        self.status
    }

    pub fn consensus_time_of_recent_alert(&self) -> Option<Timestamp> {
        self.consensus_time_of_recent_alert
    }

    pub fn alert(&mut self, consensus_time: Timestamp) {
        if self.status == IssEventStatus::NoKnownIss {
            self.remaining_rounds_to_dump = self.rounds_to_dump;
        }
        self.status = IssEventStatus::OngoingIss;
        self.consensus_time_of_recent_alert = Some(consensus_time);
    }

    pub fn relax(&mut self) {
        self.status = IssEventStatus::NoKnownIss;
        self.consensus_time_of_recent_alert = None;
        self.remaining_rounds_to_dump = 0;
    }

    pub fn should_dump_this_round(&self) -> bool {
        self.remaining_rounds_to_dump > 0
    }

    pub fn decrement_rounds_to_dump(&mut self) {
        self.remaining_rounds_to_dump = self.remaining_rounds_to_dump.saturating_sub(1);
    }
}

// =============================================================================
// CLOCK
// =============================================================================

pub struct ConsensusClock {
    last_handled: Option<Timestamp>,
    midnight_rates: ExchangeRateSet,
    iss: SharedIssEventInfo,
    iss_reset_period_secs: i64,
}

impl ConsensusClock {
    pub fn new(
        midnight_rates: ExchangeRateSet,
        iss: SharedIssEventInfo,
        iss_reset_period_secs: i64,
    ) -> Self {
        Self {
            last_handled: None,
            midnight_rates,
            iss,
            iss_reset_period_secs,
        }
    }

    pub fn last_handled(&self) -> Option<Timestamp> {
        self.last_handled
    }

    pub fn midnight_rates(&self) -> &ExchangeRateSet {
        &self.midnight_rates
    }

    pub fn iss_info(&self) -> SharedIssEventInfo {
        Arc::clone(&self.iss)
    }

    /// True for the first transaction and for any time strictly after the
    /// watermark.
    pub fn is_after_last_handled(&self, consensus_time: &Timestamp) -> bool {
        self.last_handled
            .map_or(true, |last| consensus_time.is_after(&last))
    }

    /// Moves the watermark to `now`, first snapshotting `active_rates` as the
    /// midnight rates if `now` is on a different UTC day than the watermark.
    /// Returns whether the rates were replaced.
    pub fn advance_to<F>(&mut self, now: Timestamp, active_rates: F) -> bool
    where
        F: FnOnce() -> ExchangeRateSet,
    {
        let new_day = self
            .last_handled
            .is_some_and(|last| !last.in_same_utc_day(&now));
        if new_day {
            self.midnight_rates = active_rates();
        }
        self.last_handled = Some(now);
        new_day
    }

    /// Relaxes an ongoing ISS once `now` is past the alert plus the reset
    /// period. Returns whether it relaxed.
    pub fn relax_iss_if_due(&self, now: &Timestamp) -> bool {
        let mut iss = self.iss.lock();
        if iss.status() != IssEventStatus::OngoingIss {
            return false;
        }
        let due = iss
            .consensus_time_of_recent_alert()
            .map_or(true, |alert| now.is_after(&alert.plus_seconds(self.iss_reset_period_secs)));
        if due {
            iss.relax();
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ExchangeRate;

    fn rates(cents: u32) -> ExchangeRateSet {
        let rate = ExchangeRate {
            hbar_equiv: 1,
            cent_equiv: cents,
            expiration_secs: i64::MAX,
        };
        ExchangeRateSet {
            current: rate,
            next: rate,
        }
    }

    fn clock() -> ConsensusClock {
        ConsensusClock::new(rates(12), IssEventInfo::shared(3), 60)
    }

    #[test]
    fn test_watermark_is_strict() {
        let mut clock = clock();
        let t = Timestamp::new(1_614_600_000, 5);
        assert!(clock.is_after_last_handled(&t));
        clock.advance_to(t, || rates(12));
        assert!(!clock.is_after_last_handled(&t));
        assert!(clock.is_after_last_handled(&t.plus_nanos(1)));
    }

    #[test]
    fn test_midnight_rates_replaced_on_new_day_only() {
        let mut clock = clock();
        // 2021-03-01T23:59:59Z
        let before_midnight = Timestamp::of_seconds(1_614_643_199);
        assert!(!clock.advance_to(before_midnight, || rates(99)));
        assert_eq!(clock.midnight_rates(), &rates(12));

        assert!(!clock.advance_to(before_midnight.plus_nanos(1), || rates(99)));
        assert!(clock.advance_to(before_midnight.plus_seconds(1), || rates(15)));
        assert_eq!(clock.midnight_rates(), &rates(15));
    }

    #[test]
    fn test_iss_relaxes_after_reset_period() {
        let clock = clock();
        let alert = Timestamp::of_seconds(1_000);
        clock.iss_info().lock().alert(alert);

        assert!(!clock.relax_iss_if_due(&alert.plus_seconds(60)));
        assert_eq!(clock.iss_info().lock().status(), IssEventStatus::OngoingIss);

        assert!(clock.relax_iss_if_due(&alert.plus_seconds(60).plus_nanos(1)));
        assert_eq!(clock.iss_info().lock().status(), IssEventStatus::NoKnownIss);
    }

    #[test]
    fn test_rounds_to_dump_countdown() {
        let mut info = IssEventInfo::new(2);
        assert!(!info.should_dump_this_round());
        info.alert(Timestamp::of_seconds(1));
        assert!(info.should_dump_this_round());
        info.decrement_rounds_to_dump();
        info.alert(Timestamp::of_seconds(2));
        info.decrement_rounds_to_dump();
        assert!(!info.should_dump_this_round());
        assert_eq!(info.consensus_time_of_recent_alert(), Some(Timestamp::of_seconds(2)));
    }
}
