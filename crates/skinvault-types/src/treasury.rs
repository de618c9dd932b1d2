//! The buyback treasury.

use serde::{Deserialize, Serialize};

use crate::{Result, SkinVaultError};

/// Payment-asset balance held by the protocol for buybacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryAccount {
    pub balance: u64,
    pub total_deposited: u64,
    pub total_withdrawn: u64,
    pub total_paid_out: u64,
}

impl TreasuryAccount {
    /// The balance left after paying `amount`, if it stays at or above `floor`.
    ///
    /// This is the circuit breaker shared by withdrawals and buybacks.
    ///
    /// # Errors
    /// [`SkinVaultError::TreasuryInsufficient`] if the balance cannot cover
    /// `amount` or would drop below `floor`.
    pub fn balance_after(&self, amount: u64, floor: u64) -> Result<u64> {
        let breach = || SkinVaultError::TreasuryInsufficient {
            balance: self.balance,
            requested: amount,
            floor,
        };
        let remaining = self.balance.checked_sub(amount).ok_or_else(breach)?;
        if remaining < floor {
            return Err(breach());
        }
        Ok(remaining)
    }
}
