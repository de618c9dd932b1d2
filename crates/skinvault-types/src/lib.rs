//! # skinvault-types
//!
//! Shared types, errors, and configuration for the **SkinVault** protocol.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`BoxId`], [`BatchId`], [`InventoryHash`], [`RequestId`], [`OraclePubkey`], [`RecordAddress`]
//! - **Protocol singleton**: [`GlobalConfig`]
//! - **Records**: [`Batch`], [`BoxState`], [`BoxPhase`], [`VrfPending`], [`InventoryAssignment`], [`PriceRecord`], [`TreasuryAccount`]
//! - **Events**: [`ProtocolEvent`], [`EventRecord`]
//! - **Configuration**: [`ProtocolConfig`]
//! - **Errors**: [`SkinVaultError`] with `SV_ERR_` prefix codes
//! - **Amounts**: [`amount::to_decimal`] for human-readable display
//! - **Constants**: system-wide limits and defaults

pub mod amount;
pub mod batch;
pub mod box_state;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod global;
pub mod ids;
pub mod inventory;
pub mod price;
pub mod treasury;
pub mod vrf;

// Re-export all primary types at crate root for ergonomic imports:
//   use skinvault_types::{BoxState, Batch, SkinVaultError, ...};

pub use batch::*;
pub use box_state::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use global::*;
pub use ids::*;
pub use inventory::*;
pub use price::*;
pub use treasury::*;
pub use vrf::*;

// Constants are accessed via `skinvault_types::constants::FOO`
// (not re-exported to avoid name collisions).
