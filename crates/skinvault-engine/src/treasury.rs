//! # Treasury & Buyback Engine
//!
//! The treasury buys assigned items back from box owners at the latest
//! fresh oracle price minus the spread fee. A circuit breaker refuses any
//! payout or withdrawal that would leave the treasury below
//! `min_treasury_balance`.
//!
//! Payment-asset balances of everyone but the treasury live in the payment
//! ledger. `fund_account` and `cash_out` are the only ways value crosses the
//! protocol boundary, which is what [`Vault::verify_supply`] checks against.

use skinvault_core::{compute_payout, fresh_price};
use skinvault_types::amount::to_decimal;
use skinvault_types::{Address, BoxId, ProtocolEvent, Result, SkinVaultError};
use tracing::{info, warn};

use crate::Vault;

impl Vault {
    /// Sell an assigned item back to the treasury. Box owner only.
    ///
    /// Returns the payout credited to the seller.
    ///
    /// # Errors
    /// - [`SkinVaultError::ProtocolPaused`], [`SkinVaultError::BuybackDisabled`]
    /// - [`SkinVaultError::BoxNotFound`], [`SkinVaultError::NotBoxOwner`]
    /// - [`SkinVaultError::NotOpenedYet`], [`SkinVaultError::InventoryNotAssigned`],
    ///   [`SkinVaultError::AlreadyRedeemed`]
    /// - [`SkinVaultError::PriceStale`] without a fresh quote
    /// - [`SkinVaultError::SlippageExceeded`] if the quote is below `min_price`
    /// - [`SkinVaultError::TreasuryInsufficient`] if the payout would breach
    ///   the treasury floor
    /// - [`SkinVaultError::CustodyRejected`] if the asset burn fails
    pub fn sell_back(&self, caller: Address, box_id: BoxId, min_price: u64) -> Result<u64> {
        let global = self.global_snapshot()?;
        global.require_not_paused()?;
        if !global.buyback_enabled {
            return Err(SkinVaultError::BuybackDisabled);
        }
        let now = self.now();

        let (item, price, payout) = self.boxes.update(
            &box_id,
            || SkinVaultError::BoxNotFound(box_id),
            |b| {
                if b.owner != caller {
                    return Err(SkinVaultError::NotBoxOwner { box_id, caller });
                }
                if !b.opened {
                    return Err(SkinVaultError::NotOpenedYet(box_id));
                }
                if !b.is_assigned() {
                    return Err(SkinVaultError::InventoryNotAssigned(box_id));
                }
                if b.redeemed {
                    return Err(SkinVaultError::AlreadyRedeemed(box_id));
                }
                let item = b.assigned_inventory;
                let price = fresh_price(
                    &item,
                    self.prices.get(&item).as_ref(),
                    now,
                    self.config.max_price_age_secs,
                )?;
                if price < min_price {
                    return Err(SkinVaultError::SlippageExceeded { price, min_price });
                }
                let payout = compute_payout(price, self.config.spread_fee_bps)?;

                self.treasury.update(&(), || SkinVaultError::NotInitialized, |t| {
                    let paid_out = t
                        .total_paid_out
                        .checked_add(payout)
                        .ok_or(SkinVaultError::overflow("treasury total_paid_out"))?;
                    // Seller's account guard spans the global commit.
                    let (remaining, _) = self.payments.credit_with(caller, payout, || {
                        self.global.update(&(), || SkinVaultError::NotInitialized, |g| {
                            g.require_not_paused()?;
                            if !g.buyback_enabled {
                                return Err(SkinVaultError::BuybackDisabled);
                            }
                            let remaining = t.balance_after(payout, g.min_treasury_balance).inspect_err(|_| {
                                warn!(
                                    box_id = %box_id,
                                    balance = t.balance,
                                    payout,
                                    floor = g.min_treasury_balance,
                                    "Buyback blocked by treasury circuit breaker"
                                );
                            })?;
                            let buybacks = g
                                .total_buybacks
                                .checked_add(1)
                                .ok_or(SkinVaultError::overflow("total_buybacks"))?;
                            let volume = g
                                .total_buyback_volume
                                .checked_add(payout)
                                .ok_or(SkinVaultError::overflow("total_buyback_volume"))?;
                            // Last fallible step; nothing has been written yet.
                            self.custody.burn_box_asset(&box_id, &caller)?;
                            g.total_buybacks = buybacks;
                            g.total_buyback_volume = volume;
                            Ok(remaining)
                        })
                    })?;

                    t.balance = remaining;
                    t.total_paid_out = paid_out;
                    Ok(())
                })?;

                b.redeemed = true;
                b.redeem_time = now;
                self.emit(ProtocolEvent::BuybackExecuted {
                    box_id,
                    seller: caller,
                    inventory_hash: item,
                    price,
                    payout,
                });
                Ok((item, price, payout))
            },
        )?;

        info!(
            box_id = %box_id,
            seller = %caller,
            item = %item,
            price = %to_decimal(price),
            payout = %to_decimal(payout),
            "Buyback executed"
        );
        Ok(payout)
    }

    /// Move `amount` from the depositor's balance into the treasury.
    ///
    /// # Errors
    /// - [`SkinVaultError::ProtocolPaused`] while paused
    /// - [`SkinVaultError::InsufficientBalance`] if the depositor cannot cover it
    pub fn deposit_treasury(&self, depositor: Address, amount: u64) -> Result<u64> {
        self.global_snapshot()?.require_not_paused()?;

        let balance = self.treasury.update(&(), || SkinVaultError::NotInitialized, |t| {
            let balance = t
                .balance
                .checked_add(amount)
                .ok_or(SkinVaultError::overflow("treasury balance"))?;
            let deposited = t
                .total_deposited
                .checked_add(amount)
                .ok_or(SkinVaultError::overflow("treasury total_deposited"))?;
            self.payments.debit(depositor, amount)?;
            t.balance = balance;
            t.total_deposited = deposited;
            self.emit(ProtocolEvent::TreasuryDeposit {
                depositor,
                amount,
                new_balance: balance,
            });
            Ok(balance)
        })?;

        info!(
            depositor = %depositor,
            amount = %to_decimal(amount),
            balance = %to_decimal(balance),
            "Treasury deposit"
        );
        Ok(balance)
    }

    /// Pay `amount` out of the treasury to `recipient`. Authority only.
    ///
    /// The treasury must stay at or above its floor afterwards.
    ///
    /// # Errors
    /// - [`SkinVaultError::Unauthorized`] unless `caller` is the authority
    /// - [`SkinVaultError::TreasuryInsufficient`] if the floor would be breached
    pub fn withdraw_treasury(&self, caller: Address, recipient: Address, amount: u64) -> Result<u64> {
        self.global_snapshot()?.require_authority(caller)?;

        let balance = self.treasury.update(&(), || SkinVaultError::NotInitialized, |t| {
            let global = self.global_snapshot()?;
            global.require_authority(caller)?;
            let remaining = t.balance_after(amount, global.min_treasury_balance)?;
            let withdrawn = t
                .total_withdrawn
                .checked_add(amount)
                .ok_or(SkinVaultError::overflow("treasury total_withdrawn"))?;
            self.payments.credit(recipient, amount)?;
            t.balance = remaining;
            t.total_withdrawn = withdrawn;
            self.emit(ProtocolEvent::TreasuryWithdrawal {
                recipient,
                amount,
                new_balance: remaining,
            });
            Ok(remaining)
        })?;

        info!(
            recipient = %recipient,
            amount = %to_decimal(amount),
            balance = %to_decimal(balance),
            "Treasury withdrawal"
        );
        Ok(balance)
    }

    /// External inflow: the custody layer credits `account` with funds
    /// entering the protocol.
    pub fn fund_account(&self, account: Address, amount: u64) -> Result<u64> {
        self.payments.fund(account, amount)
    }

    /// External outflow: `account` takes funds out of the protocol.
    ///
    /// # Errors
    /// [`SkinVaultError::InsufficientBalance`] if the account cannot cover it.
    pub fn cash_out(&self, account: Address, amount: u64) -> Result<u64> {
        self.payments.cash_out(account, amount)
    }

    #[must_use]
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.payments.balance_of(account)
    }

    pub fn treasury_balance(&self) -> Result<u64> {
        Ok(self.treasury_account()?.balance)
    }

    /// Check `Σ(accounts) + treasury == inflows − outflows`.
    ///
    /// Meaningful only while no operation is in flight.
    ///
    /// # Errors
    /// [`SkinVaultError::SupplyInvariantViolation`] on mismatch.
    pub fn verify_supply(&self) -> Result<()> {
        self.payments.verify_supply(self.treasury_balance()?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use skinvault_ledger::{ManualClock, RejectingCustody};
    use skinvault_types::{BoxPhase, ProtocolConfig};

    use super::*;
    use crate::testkit::Harness;

    #[test]
    fn deposit_moves_funds_into_treasury() {
        let h = Harness::new();
        h.vault.fund_account(h.alice, 1_000).unwrap();
        assert_eq!(h.vault.deposit_treasury(h.alice, 600).unwrap(), 600);
        assert_eq!(h.vault.balance_of(&h.alice), 400);
        assert_eq!(h.vault.treasury_balance().unwrap(), 600);
        assert_eq!(h.vault.treasury_account().unwrap().total_deposited, 600);
        h.vault.verify_supply().unwrap();
    }

    #[test]
    fn deposit_without_funds_rejected() {
        let h = Harness::new();
        let err = h.vault.deposit_treasury(h.alice, 1).unwrap_err();
        assert!(matches!(err, SkinVaultError::InsufficientBalance { .. }));
        assert_eq!(h.vault.treasury_balance().unwrap(), 0);
    }

    #[test]
    fn withdraw_respects_floor() {
        let h = Harness::new();
        h.fund_treasury(500);
        let err = h
            .vault
            .withdraw_treasury(h.authority, h.bob, 101)
            .unwrap_err();
        assert_eq!(
            err,
            SkinVaultError::TreasuryInsufficient {
                balance: 500,
                requested: 101,
                floor: 400
            }
        );
        assert_eq!(h.vault.withdraw_treasury(h.authority, h.bob, 100).unwrap(), 400);
        assert_eq!(h.vault.balance_of(&h.bob), 100);
        h.vault.verify_supply().unwrap();
    }

    #[test]
    fn withdraw_authority_only() {
        let h = Harness::new();
        h.fund_treasury(1_000);
        assert_eq!(
            h.vault.withdraw_treasury(h.alice, h.alice, 1).unwrap_err(),
            SkinVaultError::Unauthorized(h.alice)
        );
    }

    #[test]
    fn sell_back_pays_price_minus_spread() {
        let h = Harness::with_batch();
        h.fund_treasury(10_000);
        let id = h.assigned_box(h.alice, 2);
        h.quote(h.items[2], 1_000, 1_000).unwrap();

        let payout = h.vault.sell_back(h.alice, id, 1_000).unwrap();
        assert_eq!(payout, 990);
        assert_eq!(h.vault.balance_of(&h.alice), 990);
        assert_eq!(h.vault.treasury_balance().unwrap(), 9_010);

        let b = h.vault.box_state(&id).unwrap();
        assert_eq!(b.phase(), BoxPhase::Redeemed);
        assert_eq!(b.redeem_time, 1_000);
        let g = h.vault.global_config().unwrap();
        assert_eq!(g.total_buybacks, 1);
        assert_eq!(g.total_buyback_volume, 990);
        assert_eq!(h.custody.burned(), vec![(id, h.alice)]);
        h.vault.verify_supply().unwrap();
    }

    #[test]
    fn sell_back_twice_rejected() {
        let h = Harness::with_batch();
        h.fund_treasury(10_000);
        let id = h.assigned_box(h.alice, 2);
        h.quote(h.items[2], 1_000, 1_000).unwrap();
        h.vault.sell_back(h.alice, id, 0).unwrap();
        assert_eq!(
            h.vault.sell_back(h.alice, id, 0).unwrap_err(),
            SkinVaultError::AlreadyRedeemed(id)
        );
        assert_eq!(h.vault.balance_of(&h.alice), 990);
    }

    #[test]
    fn sell_back_preconditions() {
        let h = Harness::with_batch();
        h.fund_treasury(10_000);
        let minted = h.mint(h.alice);
        assert_eq!(
            h.vault.sell_back(h.alice, minted, 0).unwrap_err(),
            SkinVaultError::NotOpenedYet(minted)
        );
        let opened = h.opened_box(h.alice, 6);
        assert_eq!(
            h.vault.sell_back(h.alice, opened, 0).unwrap_err(),
            SkinVaultError::InventoryNotAssigned(opened)
        );
        let assigned = h.assigned_box(h.bob, 1);
        assert_eq!(
            h.vault.sell_back(h.alice, assigned, 0).unwrap_err(),
            SkinVaultError::NotBoxOwner {
                box_id: assigned,
                caller: h.alice
            }
        );
    }

    #[test]
    fn sell_back_needs_fresh_price() {
        let h = Harness::with_batch();
        h.fund_treasury(10_000);
        let id = h.assigned_box(h.alice, 2);
        let item = h.items[2];
        assert_eq!(
            h.vault.sell_back(h.alice, id, 0).unwrap_err(),
            SkinVaultError::PriceStale(item)
        );
        h.quote(item, 1_000, 1_000).unwrap();
        h.clock.advance(301);
        assert_eq!(
            h.vault.sell_back(h.alice, id, 0).unwrap_err(),
            SkinVaultError::PriceStale(item)
        );
    }

    #[test]
    fn sell_back_slippage() {
        let h = Harness::with_batch();
        h.fund_treasury(10_000);
        let id = h.assigned_box(h.alice, 2);
        h.quote(h.items[2], 1_000, 1_000).unwrap();
        assert_eq!(
            h.vault.sell_back(h.alice, id, 1_001).unwrap_err(),
            SkinVaultError::SlippageExceeded {
                price: 1_000,
                min_price: 1_001
            }
        );
        assert!(!h.vault.box_state(&id).unwrap().redeemed);
    }

    #[test]
    fn sell_back_circuit_breaker() {
        let h = Harness::with_batch();
        h.fund_treasury(500);
        let id = h.assigned_box(h.alice, 2);
        h.quote(h.items[2], 200, 1_000).unwrap();
        let err = h.vault.sell_back(h.alice, id, 0).unwrap_err();
        assert_eq!(
            err,
            SkinVaultError::TreasuryInsufficient {
                balance: 500,
                requested: 198,
                floor: 400
            }
        );
        assert_eq!(h.vault.treasury_balance().unwrap(), 500);
        assert_eq!(h.vault.global_config().unwrap().total_buybacks, 0);
        assert!(h.custody.burned().is_empty());
    }

    #[test]
    fn sell_back_disabled_or_paused() {
        let h = Harness::with_batch();
        h.fund_treasury(10_000);
        let id = h.assigned_box(h.alice, 2);
        h.quote(h.items[2], 1_000, 1_000).unwrap();
        h.vault.toggle_buyback(h.authority, false).unwrap();
        assert_eq!(
            h.vault.sell_back(h.alice, id, 0).unwrap_err(),
            SkinVaultError::BuybackDisabled
        );
        h.vault.toggle_buyback(h.authority, true).unwrap();
        h.vault.emergency_pause(h.authority, true).unwrap();
        assert_eq!(
            h.vault.sell_back(h.alice, id, 0).unwrap_err(),
            SkinVaultError::ProtocolPaused
        );
    }

    #[test]
    fn custody_refusal_aborts_without_state_change() {
        let h = Harness::build(
            ProtocolConfig::default(),
            Arc::new(ManualClock::new(1_000)),
            Some(Arc::new(RejectingCustody)),
            true,
        );
        h.publish(skinvault_types::BatchId(1));
        h.fund_treasury(10_000);
        let id = h.assigned_box(h.alice, 2);
        h.quote(h.items[2], 1_000, 1_000).unwrap();
        let err = h.vault.sell_back(h.alice, id, 0).unwrap_err();
        assert!(matches!(err, SkinVaultError::CustodyRejected { .. }));
        assert!(!h.vault.box_state(&id).unwrap().redeemed);
        assert_eq!(h.vault.treasury_balance().unwrap(), 10_000);
        assert_eq!(h.vault.balance_of(&h.alice), 0);
        assert_eq!(h.vault.global_config().unwrap().total_buybacks, 0);
    }

    #[test]
    fn seller_overflow_aborts_before_burn() {
        let h = Harness::with_batch();
        h.fund_treasury(10_000);
        let id = h.assigned_box(h.alice, 2);
        h.quote(h.items[2], 1_000, 1_000).unwrap();
        h.vault.fund_account(h.alice, u64::MAX - 100).unwrap();

        let err = h.vault.sell_back(h.alice, id, 0).unwrap_err();
        assert!(matches!(err, SkinVaultError::ArithmeticOverflow { .. }));
        assert!(h.custody.burned().is_empty());
        assert!(!h.vault.box_state(&id).unwrap().redeemed);
        assert_eq!(h.vault.treasury_balance().unwrap(), 10_000);
        assert_eq!(h.vault.balance_of(&h.alice), u64::MAX - 100);
        let g = h.vault.global_config().unwrap();
        assert_eq!((g.total_buybacks, g.total_buyback_volume), (0, 0));
        h.vault.verify_supply().unwrap();
    }

    #[test]
    fn cash_out_keeps_supply_conserved() {
        let h = Harness::new();
        h.vault.fund_account(h.bob, 700).unwrap();
        h.vault.cash_out(h.bob, 200).unwrap();
        assert_eq!(h.vault.balance_of(&h.bob), 500);
        h.vault.verify_supply().unwrap();
    }
}
