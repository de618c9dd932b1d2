//! Sorted-pair SHA-256 Merkle commitments over inventory snapshots.
//!
//! Each parent is `SHA-256(min(a, b) ‖ max(a, b))`, so a proof is just the
//! list of siblings from leaf to root with no left/right flags. A node with
//! no partner on an odd-sized level is paired with itself, and the proof
//! records it as its own sibling.

use sha2::{Digest, Sha256};
use skinvault_types::{InventoryHash, Result, SkinVaultError};

/// Parent of two nodes, independent of their order.
#[must_use]
pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(lo);
    hasher.update(hi);
    hasher.finalize().into()
}

/// Leaf hash of an inventory item: `SHA-256(item_id ‖ "|" ‖ metadata)`.
///
/// Operators use this to derive the [`InventoryHash`] they publish.
#[must_use]
pub fn inventory_leaf(item_id: &str, metadata: &str) -> InventoryHash {
    let mut hasher = Sha256::new();
    hasher.update(item_id.as_bytes());
    hasher.update(b"|");
    hasher.update(metadata.as_bytes());
    InventoryHash(hasher.finalize().into())
}

/// Fold `proof` over `leaf` and compare with `root`.
#[must_use]
pub fn verify_proof(leaf: &[u8; 32], proof: &[[u8; 32]], root: &[u8; 32]) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |acc, sibling| hash_pair(&acc, sibling));
    computed == *root
}

/// Proof length for every leaf of a tree over `leaf_count` leaves:
/// `ceil(log2(leaf_count))`, since unpaired nodes are hashed with themselves.
#[must_use]
pub fn proof_depth(leaf_count: u64) -> usize {
    if leaf_count <= 1 {
        0
    } else {
        (u64::BITS - (leaf_count - 1).leading_zeros()) as usize
    }
}

/// Depth-bounded verification of an inventory item against a batch root.
///
/// The proof must have exactly [`proof_depth`]`(total_items)` siblings, so
/// an internal node (or the root itself) cannot pass as an item.
///
/// # Errors
/// - [`SkinVaultError::MerkleProofTooDeep`] if `proof` is longer than `max_depth`
/// - [`SkinVaultError::InvalidMerkleProof`] if the item is zero, the proof
///   has the wrong length for the batch, or it does not reproduce `root`
pub fn check_inclusion(
    item: &InventoryHash,
    proof: &[[u8; 32]],
    root: &[u8; 32],
    total_items: u64,
    max_depth: usize,
) -> Result<()> {
    if proof.len() > max_depth {
        return Err(SkinVaultError::MerkleProofTooDeep {
            depth: proof.len(),
            max: max_depth,
        });
    }
    if item.is_zero()
        || proof.len() != proof_depth(total_items)
        || !verify_proof(item.as_bytes(), proof, root)
    {
        return Err(SkinVaultError::InvalidMerkleProof(*item));
    }
    Ok(())
}

/// A fully materialised tree, kept level by level so proofs can be read off.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// `levels[0]` are the leaves, the last level holds only the root.
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Build the tree over `leaves` in the given order. `None` if empty.
    #[must_use]
    pub fn build(leaves: Vec<[u8; 32]>) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }
        let mut levels = vec![leaves];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next = current
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    hash_pair(left, pair.get(1).unwrap_or(left))
                })
                .collect();
            levels.push(next);
        }
        Some(Self { levels })
    }

    /// Build over inventory hashes.
    #[must_use]
    pub fn from_inventory(items: &[InventoryHash]) -> Option<Self> {
        Self::build(items.iter().map(|item| item.0).collect())
    }

    #[must_use]
    pub fn root(&self) -> [u8; 32] {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or([0u8; 32])
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Sibling path for the first occurrence of `leaf`, or `None` if absent.
    #[must_use]
    pub fn proof(&self, leaf: &[u8; 32]) -> Option<Vec<[u8; 32]>> {
        let mut index = self.levels.first()?.iter().position(|l| l == leaf)?;
        let mut proof = Vec::with_capacity(self.levels.len().saturating_sub(1));
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = index ^ 1;
            // An unpaired node was hashed with itself.
            proof.push(*level.get(sibling).unwrap_or(&level[index]));
            index /= 2;
        }
        Some(proof)
    }
}
