//! Integration test: full protocol lifecycle
//!
//! PUBLISH → MINT → OPEN → CALLBACK → ASSIGN → PRICE → SELL BACK
//!
//! Drives one vault through every component with the ledger clock under
//! test control, and checks the audit trail it leaves behind.

mod common;

use common::{randomness, world};
use skinvault_types::{Address, BoxPhase, ProtocolEvent, SkinVaultError};

#[test]
fn assigned_item_cannot_back_second_box() {
    let w = world(4, 400);
    let alice = Address::random();
    let bob = Address::random();

    // VRF returns 6 → index 2 of pool 4 → h3.
    let (first, index) = w.open_and_draw(alice, 6);
    assert_eq!(index, 2);
    let h3 = w.items[2];
    w.vault.assign(alice, first, h3, &w.proof(&h3), None).unwrap();
    assert_eq!(w.vault.box_state(&first).unwrap().phase(), BoxPhase::Assigned);

    let (second, _) = w.open_and_draw(bob, 10);
    let err = w
        .vault
        .assign(bob, second, h3, &w.proof(&h3), None)
        .unwrap_err();
    assert_eq!(err, SkinVaultError::InventoryAlreadyAssigned(h3));
    assert_eq!(w.vault.assignment(&h3).unwrap().box_id, first);
}

#[test]
fn price_updates_must_move_forward() {
    let w = world(4, 400);
    let h3 = w.items[2];

    w.quote(h3, 100, 1_000).unwrap();

    let stale_sig = w.oracle.sign_quote(&h3, 100, 999);
    let err = w
        .vault
        .set_price_signed(h3, 100, 999, &stale_sig)
        .unwrap_err();
    assert!(matches!(err, SkinVaultError::InvalidTimestamp { timestamp: 999, .. }));

    w.quote(h3, 95, 1_001).unwrap();
    let record = w.vault.price(&h3).unwrap();
    assert_eq!(record.price, 95);
    assert_eq!(record.timestamp, 1_001);
    assert_eq!(record.update_count, 2);
}

#[test]
fn circuit_breaker_protects_treasury_floor() {
    let w = world(4, 400);
    let seller = Address::random();
    w.fund_treasury(500);

    // randomness 4 → index 0, randomness 5 → index 1.
    let (expensive, _) = w.open_and_draw(seller, 4);
    let (cheap, _) = w.open_and_draw(seller, 5);
    let (h1, h2) = (w.items[0], w.items[1]);
    w.vault.assign(seller, expensive, h1, &w.proof(&h1), None).unwrap();
    w.vault.assign(seller, cheap, h2, &w.proof(&h2), None).unwrap();

    // 151 less a 1% fee truncated to 1 pays 150; 90 pays 90.
    w.quote(h1, 151, 1_000).unwrap();
    w.quote(h2, 90, 1_000).unwrap();

    let err = w.vault.sell_back(seller, expensive, 0).unwrap_err();
    assert_eq!(
        err,
        SkinVaultError::TreasuryInsufficient {
            balance: 500,
            requested: 150,
            floor: 400
        }
    );
    assert_eq!(w.vault.treasury_balance().unwrap(), 500);

    assert_eq!(w.vault.sell_back(seller, cheap, 90).unwrap(), 90);
    assert_eq!(w.vault.treasury_balance().unwrap(), 410);
    assert_eq!(w.vault.balance_of(&seller), 90);
    assert!(!w.vault.box_state(&expensive).unwrap().redeemed);
    assert!(w.vault.box_state(&cheap).unwrap().redeemed);
    w.vault.verify_supply().unwrap();
}

#[test]
fn full_lifecycle_leaves_complete_audit_trail() {
    let w = world(4, 0);
    let buyer = Address::random();
    w.fund_treasury(5_000);

    // =====================================================================
    // OPEN: request, then the provider answers a few seconds later
    // =====================================================================
    let id = w.mint(buyer);
    let request = w.vault.open_box(buyer, id, 4).unwrap();
    assert_eq!(w.vault.box_state(&id).unwrap().phase(), BoxPhase::Minted);
    w.clock.advance(12);
    let index = w.vault.vrf_callback(w.vrf, id, request, randomness(7)).unwrap();
    assert_eq!(index, 3);

    // =====================================================================
    // ASSIGN + PRICE
    // =====================================================================
    let item = w.items[3];
    w.vault.assign(buyer, id, item, &w.proof(&item), None).unwrap();
    w.quote(item, 2_000, 1_010).unwrap();

    // =====================================================================
    // SELL BACK + CASH OUT
    // =====================================================================
    let payout = w.vault.sell_back(buyer, id, 1_900).unwrap();
    assert_eq!(payout, 1_980);
    assert_eq!(w.custody.burned(), vec![(id, buyer)]);
    w.vault.cash_out(buyer, payout).unwrap();
    assert_eq!(w.vault.balance_of(&buyer), 0);
    w.vault.verify_supply().unwrap();

    let treasury = w.vault.treasury_account().unwrap();
    assert_eq!(treasury.balance, 3_020);
    assert_eq!(treasury.total_deposited, 5_000);
    assert_eq!(treasury.total_paid_out, 1_980);

    let global = w.vault.global_config().unwrap();
    assert_eq!(global.total_boxes_minted, 1);
    assert_eq!(global.total_buybacks, 1);
    assert_eq!(global.total_buyback_volume, 1_980);

    // =====================================================================
    // AUDIT TRAIL
    // =====================================================================
    let history = w.vault.event_history();
    let kinds: Vec<_> = history.iter().map(|r| r.event.kind()).collect();
    assert_eq!(
        kinds,
        [
            "initialized",
            "merkle_published",
            "treasury_deposit",
            "box_minted",
            "box_open_requested",
            "box_opened",
            "inventory_assigned",
            "price_set",
            "buyback_executed",
        ]
    );
    for (i, record) in history.iter().enumerate() {
        assert_eq!(record.sequence, u64::try_from(i).unwrap());
    }
    assert_eq!(history[5].at, 1_012);

    let lines = w.vault.events().to_json_lines().unwrap();
    let parsed: Vec<serde_json::Value> = lines
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(parsed.len(), history.len());
    let buyback = &parsed[8];
    assert_eq!(buyback["event"]["type"], "buyback_executed");
    assert_eq!(buyback["event"]["payout"], 1_980);
    assert_eq!(
        history[8].event,
        ProtocolEvent::BuybackExecuted {
            box_id: id,
            seller: buyer,
            inventory_hash: item,
            price: 2_000,
            payout: 1_980,
        }
    );
}

#[test]
fn timed_out_request_can_be_retried() {
    let w = world(4, 0);
    let owner = Address::random();
    let id = w.mint(owner);
    let lost = w.vault.open_box(owner, id, 4).unwrap();

    w.clock.advance(3_600);
    assert_eq!(w.vault.cancel_open_request(owner, id).unwrap(), lost);
    let retry = w.vault.open_box(owner, id, 4).unwrap();

    // The provider's late answer to the first request finds nothing.
    assert!(matches!(
        w.vault.vrf_callback(w.vrf, id, lost, randomness(1)),
        Err(SkinVaultError::VrfNotFulfilled { .. })
    ));
    assert_eq!(w.vault.vrf_callback(w.vrf, id, retry, randomness(1)).unwrap(), 1);
}

#[test]
fn pause_halts_users_but_not_callbacks_or_prices() {
    let w = world(4, 0);
    let owner = Address::random();
    let id = w.mint(owner);
    let idle = w.mint(owner);
    let request = w.vault.open_box(owner, id, 4).unwrap();

    w.vault.emergency_pause(w.authority, true).unwrap();
    assert_eq!(
        w.vault.open_box(owner, idle, 4).unwrap_err(),
        SkinVaultError::ProtocolPaused
    );
    assert!(w.vault.vrf_callback(w.vrf, id, request, randomness(2)).is_ok());
    w.quote(w.items[2], 500, 1_000).unwrap();

    let item = w.items[2];
    assert_eq!(
        w.vault.assign(owner, id, item, &w.proof(&item), None).unwrap_err(),
        SkinVaultError::ProtocolPaused
    );

    w.vault.emergency_pause(w.authority, false).unwrap();
    w.vault.assign(owner, id, item, &w.proof(&item), None).unwrap();
}
