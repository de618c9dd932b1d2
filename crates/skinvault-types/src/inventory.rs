//! Inventory assignment records.

use serde::{Deserialize, Serialize};

use crate::{BatchId, BoxId, InventoryHash};

/// Proof that one inventory item has been bound to one box.
///
/// Keyed by `inventory_hash`. Created once by atomic create-if-absent and
/// never updated or removed; its presence is the replay guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAssignment {
    pub inventory_hash: InventoryHash,
    pub box_id: BoxId,
    pub batch_id: BatchId,
    pub assigned_at: i64,
}

/// Display metadata revealed alongside an assignment.
///
/// Not validated; forwarded to the metadata service through
/// [`crate::ProtocolEvent::InventoryAssigned`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealMetadata {
    pub name: String,
    pub uri: String,
}
