//! Payment-asset balances.
//!
//! Stands in for the token custody layer: every party's balance of the
//! payment asset (USDC) lives here, except the treasury's, which is its own
//! record in the engine. All mutations are atomic per account: either the
//! full operation succeeds or the balance is unchanged.

use dashmap::DashMap;
use skinvault_types::{Address, Result, SkinVaultError};
use tracing::debug;

use crate::SupplyConservation;

/// Per-address balances plus the supply tracker for external flows.
#[derive(Debug, Default)]
pub struct PaymentLedger {
    balances: DashMap<Address, u64>,
    supply: SupplyConservation,
}

impl PaymentLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// External inflow: funds arrive from outside the protocol.
    pub fn fund(&self, account: Address, amount: u64) -> Result<u64> {
        let balance = self.credit(account, amount)?;
        self.supply.record_inflow(amount);
        debug!(account = %account, amount, balance, "Account funded");
        Ok(balance)
    }

    /// External outflow: funds leave the protocol.
    pub fn cash_out(&self, account: Address, amount: u64) -> Result<u64> {
        let balance = self.debit(account, amount)?;
        self.supply.record_outflow(amount);
        debug!(account = %account, amount, balance, "Account cashed out");
        Ok(balance)
    }

    /// Add to an account. Returns the new balance.
    ///
    /// # Errors
    /// [`SkinVaultError::ArithmeticOverflow`] if the balance would exceed `u64`.
    pub fn credit(&self, account: Address, amount: u64) -> Result<u64> {
        self.credit_with(account, amount, || Ok(()))
            .map(|((), balance)| balance)
    }

    /// Credit `amount` to `account` only if `commit` succeeds.
    ///
    /// The account's guard is held across `commit`, so the overflow check
    /// and the write cannot be separated by another credit. `commit` may
    /// take guards that come after payment accounts in the lock order, and
    /// must not touch this ledger. Returns `commit`'s result and the new
    /// balance.
    ///
    /// # Errors
    /// [`SkinVaultError::ArithmeticOverflow`] before `commit` runs, otherwise
    /// whatever `commit` returns. Nothing is credited on error.
    pub fn credit_with<R>(
        &self,
        account: Address,
        amount: u64,
        commit: impl FnOnce() -> Result<R>,
    ) -> Result<(R, u64)> {
        let mut entry = self.balances.entry(account).or_insert(0);
        let next = entry
            .checked_add(amount)
            .ok_or(SkinVaultError::overflow("account credit"))?;
        let out = commit()?;
        *entry = next;
        Ok((out, next))
    }

    /// Take from an account. Returns the new balance.
    ///
    /// # Errors
    /// [`SkinVaultError::InsufficientBalance`] if the account holds less than `amount`.
    pub fn debit(&self, account: Address, amount: u64) -> Result<u64> {
        let insufficient = |available| SkinVaultError::InsufficientBalance {
            account,
            needed: amount,
            available,
        };
        let mut entry = self
            .balances
            .get_mut(&account)
            .ok_or_else(|| insufficient(0))?;
        let available = *entry;
        let next = available
            .checked_sub(amount)
            .ok_or_else(|| insufficient(available))?;
        *entry = next;
        Ok(next)
    }

    #[must_use]
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.balances.get(account).map_or(0, |b| *b)
    }

    /// Sum of all account balances (treasury excluded).
    #[must_use]
    pub fn total_balances(&self) -> u128 {
        self.balances.iter().map(|b| u128::from(*b.value())).sum()
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }

    /// Check `Σ(accounts) + treasury == inflows − outflows`.
    ///
    /// Only meaningful while no transfer is in flight.
    pub fn verify_supply(&self, treasury_balance: u64) -> Result<()> {
        self.supply
            .verify(self.total_balances() + u128::from(treasury_balance))
    }
}
