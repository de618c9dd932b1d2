//! # skinvault-engine
//!
//! **The SkinVault protocol state machine.**
//!
//! A [`Vault`] owns all protocol records and exposes every operation as a
//! `&self` method, safe to call from many threads at once:
//!
//! | Component | Operations |
//! |---|---|
//! | Batch registry | `publish_merkle_root` |
//! | Box lifecycle | `mint_box`, `open_box`, `vrf_callback`, `cancel_open_request` |
//! | Inventory assignment | `assign` |
//! | Price oracle ledger | `set_price_signed` |
//! | Treasury & buyback | `sell_back`, `deposit_treasury`, `withdraw_treasury` |
//! | Payment ledger | `fund_account`, `cash_out`, `balance_of`, `verify_supply` |
//! | Admin | `emergency_pause`, `toggle_buyback`, `set_min_treasury_balance`, `set_oracle`, `set_vrf_authority`, authority transfer |
//!
//! Each successful mutating operation appends exactly one
//! [`ProtocolEvent`](skinvault_types::ProtocolEvent) to the vault's event log.
//!
//! ```ignore
//! let vault = Vault::with_system_clock(ProtocolConfig::default())?;
//! vault.initialize(authority, "USDC", Some(oracle_key), vrf_provider, None)?;
//! vault.publish_merkle_root(authority, BatchId(1), root, snapshot_time, 1_000)?;
//! vault.mint_box(buyer, BatchId(1), box_id, "ipfs://box/1")?;
//! let request = vault.open_box(buyer, box_id, 1_000)?;
//! // ... the randomness provider answers:
//! let index = vault.vrf_callback(vrf_provider, box_id, request, randomness)?;
//! ```

mod admin;
mod assignment;
mod batch_registry;
mod lifecycle;
mod oracle;
mod treasury;
mod vault;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testkit;

pub use vault::Vault;
