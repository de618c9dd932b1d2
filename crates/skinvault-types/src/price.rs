//! Oracle-signed item prices.

use serde::{Deserialize, Serialize};

use crate::{InventoryHash, OraclePubkey};

/// Latest accepted quote for an inventory item.
///
/// Timestamps are strictly increasing per item and `update_count` grows by
/// one on every accepted quote, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub inventory_hash: InventoryHash,
    /// Payment-asset base units.
    pub price: u64,
    pub timestamp: i64,
    /// Key that signed the accepted quote.
    pub signing_oracle: OraclePubkey,
    pub update_count: u64,
}

impl PriceRecord {
    /// Age of the quote at `now`. Negative if the quote is from the future.
    #[must_use]
    pub fn age(&self, now: i64) -> i64 {
        now.saturating_sub(self.timestamp)
    }
}
