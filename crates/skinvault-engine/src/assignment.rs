//! Inventory Assignment Verifier.
//!
//! Binds an opened box to one real inventory item, proven to be part of the
//! box's batch by a Merkle proof. The assignment record keyed by the item
//! hash is created with create-if-absent, so an item can back at most one
//! box no matter how many callers race for it.

use skinvault_core::check_inclusion;
use skinvault_types::{
    Address, BoxId, InventoryAssignment, InventoryHash, ProtocolEvent, Result, RevealMetadata,
    SkinVaultError,
};
use tracing::info;

use crate::Vault;

impl Vault {
    /// Assign `item` to an opened box. Box owner or authority.
    ///
    /// `reveal` is forwarded to the metadata service through the
    /// `InventoryAssigned` event and plays no part in validation.
    ///
    /// # Errors
    /// - [`SkinVaultError::ProtocolPaused`] while paused
    /// - [`SkinVaultError::BoxNotFound`], [`SkinVaultError::NotBoxOwner`]
    /// - [`SkinVaultError::NotOpenedYet`] before the VRF callback
    /// - [`SkinVaultError::InventoryAlreadyAssigned`] if the box already holds
    ///   an item or the item is already taken
    /// - [`SkinVaultError::MerkleProofTooDeep`], [`SkinVaultError::InvalidMerkleProof`]
    pub fn assign(
        &self,
        caller: Address,
        box_id: BoxId,
        item: InventoryHash,
        proof: &[[u8; 32]],
        reveal: Option<RevealMetadata>,
    ) -> Result<()> {
        let global = self.global_snapshot()?;
        global.require_not_paused()?;
        let now = self.now();

        let batch_id = self.boxes.update(
            &box_id,
            || SkinVaultError::BoxNotFound(box_id),
            |b| {
                if b.owner != caller && caller != global.authority {
                    return Err(SkinVaultError::NotBoxOwner { box_id, caller });
                }
                if !b.opened {
                    return Err(SkinVaultError::NotOpenedYet(box_id));
                }
                if b.is_assigned() {
                    return Err(SkinVaultError::InventoryAlreadyAssigned(b.assigned_inventory));
                }
                if item.is_zero() {
                    return Err(SkinVaultError::InvalidMerkleProof(item));
                }
                let (root, total_items) = self
                    .batches
                    .inspect(&b.batch_id, |batch| (batch.merkle_root, batch.total_items))
                    .ok_or_else(|| SkinVaultError::InvalidBatchId {
                        batch_id: b.batch_id,
                        reason: "batch not found".to_string(),
                    })?;
                check_inclusion(
                    &item,
                    proof,
                    &root,
                    total_items,
                    self.config.max_merkle_proof_depth,
                )?;

                // Commit point: first creator of the item's record wins.
                self.assignments.create(
                    item,
                    InventoryAssignment {
                        inventory_hash: item,
                        box_id,
                        batch_id: b.batch_id,
                        assigned_at: now,
                    },
                    || SkinVaultError::InventoryAlreadyAssigned(item),
                )?;
                b.assigned_inventory = item;
                self.emit(ProtocolEvent::InventoryAssigned {
                    box_id,
                    inventory_hash: item,
                    batch_id: b.batch_id,
                    reveal,
                });
                Ok(b.batch_id)
            },
        )?;

        info!(
            box_id = %box_id,
            item = %item,
            batch = %batch_id,
            proof_len = proof.len(),
            "Inventory assigned"
        );
        Ok(())
    }
}
