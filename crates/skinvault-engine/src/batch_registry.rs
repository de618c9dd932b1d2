//! Batch Registry: publication of inventory snapshots.
//!
//! A batch is an immutable Merkle root over one inventory snapshot. Batches
//! are append-only: there is no update and no removal, and a batch ID can be
//! published exactly once.

use skinvault_types::{Address, Batch, BatchId, ProtocolEvent, Result, SkinVaultError};
use tracing::info;

use crate::Vault;

impl Vault {
    /// Publish the Merkle root of an inventory snapshot. Authority only.
    ///
    /// # Errors
    /// - [`SkinVaultError::Unauthorized`] unless `caller` is the authority
    /// - [`SkinVaultError::InvalidBatchId`] for a zero root or `total_items == 0`
    /// - [`SkinVaultError::InvalidTimestamp`] for a non-positive snapshot
    ///   time or one too far ahead of ledger time
    /// - [`SkinVaultError::BatchAlreadyExists`] if `batch_id` is taken
    pub fn publish_merkle_root(
        &self,
        caller: Address,
        batch_id: BatchId,
        merkle_root: [u8; 32],
        snapshot_time: i64,
        total_items: u64,
    ) -> Result<()> {
        self.global_snapshot()?.require_authority(caller)?;

        if merkle_root == [0u8; 32] {
            return Err(SkinVaultError::InvalidBatchId {
                batch_id,
                reason: "merkle root is zero".to_string(),
            });
        }
        if total_items == 0 {
            return Err(SkinVaultError::InvalidBatchId {
                batch_id,
                reason: "batch has no items".to_string(),
            });
        }
        let now = self.now();
        if snapshot_time <= 0 {
            return Err(SkinVaultError::InvalidTimestamp {
                timestamp: snapshot_time,
                reason: "snapshot time must be positive".to_string(),
            });
        }
        if snapshot_time > now.saturating_add(self.config.snapshot_future_tolerance_secs) {
            return Err(SkinVaultError::InvalidTimestamp {
                timestamp: snapshot_time,
                reason: "snapshot time is in the future".to_string(),
            });
        }

        let batch_count = self.batches.create_with(
            batch_id,
            || SkinVaultError::BatchAlreadyExists(batch_id),
            || {
                let count = self.global.update(&(), || SkinVaultError::NotInitialized, |g| {
                    g.require_authority(caller)?;
                    let count = g
                        .current_batch_count
                        .checked_add(1)
                        .ok_or(SkinVaultError::overflow("current_batch_count"))?;
                    g.current_batch_count = count;
                    Ok(count)
                })?;
                self.emit(ProtocolEvent::MerklePublished {
                    batch_id,
                    merkle_root,
                    snapshot_time,
                    total_items,
                });
                Ok((Batch::new(batch_id, merkle_root, snapshot_time, total_items), count))
            },
        )?;

        info!(
            batch = %batch_id,
            root = %hex::encode(&merkle_root[..8]),
            total_items,
            batch_count,
            "Merkle root published"
        );
        Ok(())
    }
}
