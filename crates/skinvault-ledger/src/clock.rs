//! Ledger time.
//!
//! Every time-dependent rule (price staleness, snapshot tolerance, VRF
//! request timeout) reads `now` from a [`LedgerClock`], never from the OS
//! directly, so tests and simulations can drive time by hand.

use chrono::Utc;
use parking_lot::RwLock;

/// Source of the current ledger time in unix seconds.
pub trait LedgerClock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall-clock time (UTC).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl LedgerClock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<i64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: i64) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn set(&self, now: i64) {
        *self.now.write() = now;
    }

    /// Move forward by `secs` (saturating). Returns the new time.
    pub fn advance(&self, secs: i64) -> i64 {
        let mut now = self.now.write();
        *now = now.saturating_add(secs);
        *now
    }
}

impl LedgerClock for ManualClock {
    fn now(&self) -> i64 {
        *self.now.read()
    }
}
