//! Deterministic record addressing.
//!
//! `address = SHA-256("skinvault:addr:v1:" ‖ seed ‖ key)`. Each record kind
//! has its own seed, so equal keys of different kinds never collide.

use sha2::{Digest, Sha256};
use skinvault_types::constants::{
    ADDRESS_DOMAIN, BATCH_SEED, BOX_SEED, GLOBAL_SEED, INVENTORY_SEED, PRICE_SEED,
    TREASURY_SEED, VRF_PENDING_SEED,
};
use skinvault_types::{BatchId, BoxId, InventoryHash, RecordAddress};

#[must_use]
pub fn derive(seed: &[u8], key: &[u8]) -> RecordAddress {
    let mut hasher = Sha256::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update(seed);
    hasher.update(key);
    RecordAddress(hasher.finalize().into())
}

#[must_use]
pub fn global_address() -> RecordAddress {
    derive(GLOBAL_SEED, &[])
}

#[must_use]
pub fn treasury_address() -> RecordAddress {
    derive(TREASURY_SEED, &[])
}

#[must_use]
pub fn batch_address(batch_id: BatchId) -> RecordAddress {
    derive(BATCH_SEED, &batch_id.to_le_bytes())
}

#[must_use]
pub fn box_address(box_id: &BoxId) -> RecordAddress {
    derive(BOX_SEED, box_id.as_bytes())
}

#[must_use]
pub fn vrf_pending_address(box_id: &BoxId) -> RecordAddress {
    derive(VRF_PENDING_SEED, box_id.as_bytes())
}

#[must_use]
pub fn inventory_address(item: &InventoryHash) -> RecordAddress {
    derive(INVENTORY_SEED, item.as_bytes())
}

#[must_use]
pub fn price_address(item: &InventoryHash) -> RecordAddress {
    derive(PRICE_SEED, item.as_bytes())
}
