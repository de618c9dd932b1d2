//! Property tests: treasury circuit breaker and supply conservation.

use std::collections::HashSet;

mod common;

use common::world;
use proptest::prelude::*;
use skinvault_core::compute_payout;
use skinvault_types::{Address, BoxId, SkinVaultError};

const BOXES: u8 = 8;

#[derive(Debug, Clone)]
enum Flow {
    Fund(u8, u64),
    CashOut(u8, u64),
    Deposit(u8, u64),
    Withdraw(u8, u64),
}

fn flow() -> impl Strategy<Value = Flow> {
    prop_oneof![
        (0..4u8, 0..10_000u64).prop_map(|(a, n)| Flow::Fund(a, n)),
        (0..4u8, 0..10_000u64).prop_map(|(a, n)| Flow::CashOut(a, n)),
        (0..4u8, 0..10_000u64).prop_map(|(a, n)| Flow::Deposit(a, n)),
        (0..4u8, 0..10_000u64).prop_map(|(a, n)| Flow::Withdraw(a, n)),
    ]
}

#[derive(Debug, Clone)]
enum Step {
    Sell { slot: u8, price: u64, min_price: u64 },
    Deposit(u64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0..BOXES, 1..5_000u64, 0..5_000u64)
            .prop_map(|(slot, price, min_price)| Step::Sell { slot, price, min_price }),
        1 => (0..3_000u64).prop_map(Step::Deposit),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn buyback_respects_floor(
        deposit in 0..20_000u64,
        floor in 0..10_000u64,
        price in 1..10_000u64,
    ) {
        let w = world(4, floor);
        let seller = Address::random();
        w.fund_treasury(deposit);
        let (id, index) = w.open_and_draw(seller, 1);
        let item = w.items[usize::try_from(index).unwrap()];
        w.vault.assign(seller, id, item, &w.proof(&item), None).unwrap();
        w.quote(item, price, 1_000).unwrap();

        let payout = compute_payout(price, 100).unwrap();
        let fits = deposit.checked_sub(payout).is_some_and(|rest| rest >= floor);
        match w.vault.sell_back(seller, id, 0) {
            Ok(paid) => {
                prop_assert!(fits);
                prop_assert_eq!(paid, payout);
                prop_assert_eq!(w.vault.treasury_balance().unwrap(), deposit - payout);
            }
            Err(SkinVaultError::TreasuryInsufficient { .. }) => {
                prop_assert!(!fits);
                prop_assert_eq!(w.vault.treasury_balance().unwrap(), deposit);
                prop_assert!(!w.vault.box_state(&id).unwrap().redeemed);
            }
            Err(e) => prop_assert!(false, "unexpected error {}", e),
        }
        prop_assert!(w.vault.verify_supply().is_ok());
    }

    #[test]
    fn supply_is_conserved(flows in prop::collection::vec(flow(), 1..40)) {
        let w = world(4, 1_000);
        let accounts: Vec<Address> = (0..4).map(|_| Address::random()).collect();

        for f in flows {
            // Rejected flows must leave no trace, so their errors are ignored.
            let _ = match f {
                Flow::Fund(a, n) => w.vault.fund_account(accounts[usize::from(a)], n),
                Flow::CashOut(a, n) => w.vault.cash_out(accounts[usize::from(a)], n),
                Flow::Deposit(a, n) => w.vault.deposit_treasury(accounts[usize::from(a)], n),
                Flow::Withdraw(a, n) => {
                    let before = w.vault.treasury_balance().unwrap();
                    let result = w.vault.withdraw_treasury(w.authority, accounts[usize::from(a)], n);
                    if result.is_ok() {
                        prop_assert!(before - n >= 1_000);
                    } else {
                        prop_assert_eq!(w.vault.treasury_balance().unwrap(), before);
                    }
                    result
                }
            };
            prop_assert!(w.vault.verify_supply().is_ok());
        }

        let t = w.vault.treasury_account().unwrap();
        prop_assert_eq!(t.balance, t.total_deposited - t.total_withdrawn - t.total_paid_out);
    }

    #[test]
    fn buyback_sequence_holds_floor(
        initial in 0..20_000u64,
        floor in 0..10_000u64,
        steps in prop::collection::vec(step(), 1..24),
    ) {
        let w = world(usize::from(BOXES), floor);
        let seller = Address::random();
        w.fund_treasury(initial);
        // Pool 8: randomness n + 8 lands on index n, so box n holds item n.
        let boxes: Vec<BoxId> = (0..u64::from(BOXES))
            .map(|n| w.assigned_box(seller, n + 8))
            .collect();
        let mut sold = HashSet::new();
        let mut paid_total = 0u64;

        for op in steps {
            let before = w.vault.treasury_balance().unwrap();
            match op {
                Step::Deposit(n) => w.fund_treasury(n),
                Step::Sell { slot, price, min_price } => {
                    let slot = usize::from(slot);
                    let now = w.clock.advance(1);
                    w.quote(w.items[slot], price, now).unwrap();
                    let payout = compute_payout(price, 100).unwrap();
                    match w.vault.sell_back(seller, boxes[slot], min_price) {
                        Ok(paid) => {
                            prop_assert!(sold.insert(slot));
                            prop_assert!(price >= min_price);
                            prop_assert_eq!(paid, payout);
                            prop_assert_eq!(w.vault.treasury_balance().unwrap(), before - paid);
                            paid_total += paid;
                        }
                        Err(SkinVaultError::AlreadyRedeemed(_)) => prop_assert!(sold.contains(&slot)),
                        Err(SkinVaultError::SlippageExceeded { .. }) => prop_assert!(price < min_price),
                        Err(SkinVaultError::TreasuryInsufficient { .. }) => {
                            prop_assert!(before.checked_sub(payout).is_none_or(|rest| rest < floor));
                        }
                        Err(e) => prop_assert!(false, "unexpected error {}", e),
                    }
                }
            }

            let after = w.vault.treasury_balance().unwrap();
            // Only deposits may leave the treasury below its floor, and only
            // if it already was.
            prop_assert!(after >= floor || after >= before);
            prop_assert!(w.vault.verify_supply().is_ok());
            prop_assert_eq!(w.vault.balance_of(&seller), paid_total);
        }

        let g = w.vault.global_config().unwrap();
        prop_assert_eq!(g.total_buybacks, u64::try_from(sold.len()).unwrap());
        prop_assert_eq!(g.total_buyback_volume, paid_total);
        prop_assert_eq!(w.vault.treasury_account().unwrap().total_paid_out, paid_total);
        prop_assert_eq!(w.custody.burned().len(), sold.len());
    }
}
