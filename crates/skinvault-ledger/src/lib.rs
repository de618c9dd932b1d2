//! # skinvault-ledger
//!
//! **State plane for SkinVault.**
//!
//! Everything the engine reads or writes lives behind the types here:
//!
//! - [`RecordStore`]: sharded record map with atomic create-if-absent and
//!   consume-once removal, the only synchronization the protocol uses
//! - [`PaymentLedger`] + [`SupplyConservation`]: payment-asset balances and
//!   the conservation invariant over external flows
//! - [`LedgerClock`]: injectable time ([`SystemClock`], [`ManualClock`])
//! - [`AssetCustody`]: the seam to the NFT custody layer
//! - [`EventLog`]: append-only, sequenced audit trail

pub mod clock;
pub mod custody;
pub mod event_log;
pub mod payment_ledger;
pub mod store;
pub mod supply_conservation;

pub use clock::{LedgerClock, ManualClock, SystemClock};
pub use custody::{AssetCustody, NoopCustody};
#[cfg(any(test, feature = "test-helpers"))]
pub use custody::{RecordingCustody, RejectingCustody};
pub use event_log::EventLog;
pub use payment_ledger::PaymentLedger;
pub use store::RecordStore;
pub use supply_conservation::SupplyConservation;
