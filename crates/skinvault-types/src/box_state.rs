//! # BoxState: the per-box lifecycle record
//!
//! ## State Machine
//!
//! ```text
//!   ┌────────┐  vrf_callback  ┌────────┐  assign  ┌──────────┐  sell_back  ┌──────────┐
//!   │ MINTED ├───────────────▶│ OPENED ├─────────▶│ ASSIGNED ├────────────▶│ REDEEMED │
//!   └────────┘                └────────┘          └──────────┘             └──────────┘
//! ```
//!
//! The phase is derived from three write-once fields: `opened`
//! (false → true), `assigned_inventory` (zero → non-zero) and `redeemed`
//! (false → true). None of them ever flips back.

use serde::{Deserialize, Serialize};

use crate::{Address, BatchId, BoxId, InventoryHash};

/// Lifecycle phase of a box.
///
/// Transitions are **monotonic**; each step is taken at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxPhase {
    /// Minted, not opened. May have a randomness request in flight.
    Minted,
    /// Randomness delivered; `random_index` is fixed.
    Opened,
    /// Matched to a real inventory item.
    Assigned,
    /// Sold back to the treasury. Terminal.
    Redeemed,
}

impl BoxPhase {
    /// Is `target` the single legal successor of this phase?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Minted, Self::Opened)
                | (Self::Opened, Self::Assigned)
                | (Self::Assigned, Self::Redeemed)
        )
    }
}

impl std::fmt::Display for BoxPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minted => write!(f, "MINTED"),
            Self::Opened => write!(f, "OPENED"),
            Self::Assigned => write!(f, "ASSIGNED"),
            Self::Redeemed => write!(f, "REDEEMED"),
        }
    }
}

/// State of an individual loot box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxState {
    pub owner: Address,
    pub batch_id: BatchId,
    pub opened: bool,
    /// [`InventoryHash::ZERO`] while unassigned.
    pub assigned_inventory: InventoryHash,
    pub box_id: BoxId,
    /// Supplied by the metadata service at mint; not interpreted.
    pub metadata_uri: String,
    pub mint_time: i64,
    /// Zero until opened.
    pub open_time: i64,
    pub random_index: u64,
    pub redeemed: bool,
    /// Zero until redeemed.
    pub redeem_time: i64,
}

impl BoxState {
    #[must_use]
    pub fn minted(
        box_id: BoxId,
        owner: Address,
        batch_id: BatchId,
        metadata_uri: String,
        mint_time: i64,
    ) -> Self {
        Self {
            owner,
            batch_id,
            opened: false,
            assigned_inventory: InventoryHash::ZERO,
            box_id,
            metadata_uri,
            mint_time,
            open_time: 0,
            random_index: 0,
            redeemed: false,
            redeem_time: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> BoxPhase {
        if self.redeemed {
            BoxPhase::Redeemed
        } else if !self.assigned_inventory.is_zero() {
            BoxPhase::Assigned
        } else if self.opened {
            BoxPhase::Opened
        } else {
            BoxPhase::Minted
        }
    }

    #[must_use]
    pub fn is_assigned(&self) -> bool {
        !self.assigned_inventory.is_zero()
    }
}
