//! Supply conservation invariant checker.
//!
//! Invariant over the payment asset, checked on demand:
//! ```text
//! Σ(account balances) + treasury == Σ(inflows) - Σ(outflows)
//! ```
//!
//! Inflows and outflows are the only ways value crosses the protocol
//! boundary; deposits, withdrawals and buybacks only move it around. A
//! mismatch means some code path minted or destroyed funds.

use parking_lot::Mutex;
use skinvault_types::{Result, SkinVaultError};

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    inflows: u128,
    outflows: u128,
}

/// Running totals of value entering and leaving the protocol.
#[derive(Debug, Default)]
pub struct SupplyConservation {
    totals: Mutex<Totals>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_inflow(&self, amount: u64) {
        self.totals.lock().inflows += u128::from(amount);
    }

    pub fn record_outflow(&self, amount: u64) {
        self.totals.lock().outflows += u128::from(amount);
    }

    /// Inflows minus outflows. Negative would already be a violation.
    #[must_use]
    pub fn expected_supply(&self) -> i128 {
        let t = *self.totals.lock();
        to_i128(t.inflows) - to_i128(t.outflows)
    }

    #[must_use]
    pub fn total_inflows(&self) -> u128 {
        self.totals.lock().inflows
    }

    #[must_use]
    pub fn total_outflows(&self) -> u128 {
        self.totals.lock().outflows
    }

    /// Compare the observed supply against the running totals.
    ///
    /// # Errors
    /// [`SkinVaultError::SupplyInvariantViolation`] if they differ.
    pub fn verify(&self, actual_supply: u128) -> Result<()> {
        let t = *self.totals.lock();
        let expected = to_i128(t.inflows) - to_i128(t.outflows);
        if to_i128(actual_supply) != expected {
            tracing::error!(
                actual = %actual_supply,
                expected = %expected,
                "Supply invariant violated"
            );
            return Err(SkinVaultError::SupplyInvariantViolation {
                reason: format!(
                    "actual supply {actual_supply} != expected {expected} \
                     (inflows={}, outflows={})",
                    t.inflows, t.outflows
                ),
            });
        }
        Ok(())
    }
}

// u64 sums stay far below i128::MAX.
fn to_i128(v: u128) -> i128 {
    i128::try_from(v).unwrap_or(i128::MAX)
}
