//! Published inventory snapshots.

use serde::{Deserialize, Serialize};

use crate::BatchId;

/// An immutable Merkle commitment to an inventory snapshot, plus the
/// monotone counters of boxes minted and opened against it.
///
/// `merkle_root` and `total_items` never change after publication.
/// `total_items` bounds the logical pool; it is not a mint cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub batch_id: BatchId,
    pub merkle_root: [u8; 32],
    pub snapshot_time: i64,
    pub total_items: u64,
    pub boxes_minted: u64,
    pub boxes_opened: u64,
}

impl Batch {
    /// A freshly published batch with zeroed counters.
    #[must_use]
    pub fn new(batch_id: BatchId, merkle_root: [u8; 32], snapshot_time: i64, total_items: u64) -> Self {
        Self {
            batch_id,
            merkle_root,
            snapshot_time,
            total_items,
            boxes_minted: 0,
            boxes_opened: 0,
        }
    }

    /// `boxes_opened ≤ boxes_minted`.
    #[must_use]
    pub fn counters_consistent(&self) -> bool {
        self.boxes_opened <= self.boxes_minted
    }
}
