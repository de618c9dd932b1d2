//! Protocol events.
//!
//! Every committed state change emits exactly one [`ProtocolEvent`]. The
//! event log wraps it in an [`EventRecord`] carrying a gap-free sequence
//! number and the ledger time of the commit. Events serialize to tagged JSON
//! for the audit trail and the metadata service.

use serde::{Deserialize, Serialize};

use crate::{
    Address, BatchId, BoxId, InventoryHash, OraclePubkey, RequestId, RevealMetadata,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    Initialized {
        authority: Address,
        vrf_authority: Address,
        payment_asset: String,
        min_treasury_balance: u64,
    },
    MerklePublished {
        batch_id: BatchId,
        merkle_root: [u8; 32],
        snapshot_time: i64,
        total_items: u64,
    },
    BoxMinted {
        box_id: BoxId,
        owner: Address,
        batch_id: BatchId,
        metadata_uri: String,
    },
    BoxOpenRequested {
        box_id: BoxId,
        request_id: RequestId,
        pool_size: u64,
    },
    BoxOpened {
        box_id: BoxId,
        request_id: RequestId,
        random_index: u64,
    },
    OpenRequestCancelled {
        box_id: BoxId,
        request_id: RequestId,
    },
    InventoryAssigned {
        box_id: BoxId,
        inventory_hash: InventoryHash,
        batch_id: BatchId,
        reveal: Option<RevealMetadata>,
    },
    PriceSet {
        inventory_hash: InventoryHash,
        price: u64,
        timestamp: i64,
        update_count: u64,
    },
    BuybackExecuted {
        box_id: BoxId,
        seller: Address,
        inventory_hash: InventoryHash,
        price: u64,
        payout: u64,
    },
    TreasuryDeposit {
        depositor: Address,
        amount: u64,
        new_balance: u64,
    },
    TreasuryWithdrawal {
        recipient: Address,
        amount: u64,
        new_balance: u64,
    },
    BuybackToggled {
        enabled: bool,
    },
    PauseSet {
        paused: bool,
    },
    MinTreasuryBalanceSet {
        amount: u64,
    },
    OracleUpdated {
        oracle_pubkey: OraclePubkey,
    },
    VrfAuthorityUpdated {
        vrf_authority: Address,
    },
    AuthorityTransferInitiated {
        current: Address,
        pending: Address,
    },
    AuthorityTransferCancelled {
        authority: Address,
    },
    AuthorityTransferred {
        previous: Address,
        new_authority: Address,
    },
}

impl ProtocolEvent {
    /// Short snake_case name, matching the serialized `type` tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Initialized { .. } => "initialized",
            Self::MerklePublished { .. } => "merkle_published",
            Self::BoxMinted { .. } => "box_minted",
            Self::BoxOpenRequested { .. } => "box_open_requested",
            Self::BoxOpened { .. } => "box_opened",
            Self::OpenRequestCancelled { .. } => "open_request_cancelled",
            Self::InventoryAssigned { .. } => "inventory_assigned",
            Self::PriceSet { .. } => "price_set",
            Self::BuybackExecuted { .. } => "buyback_executed",
            Self::TreasuryDeposit { .. } => "treasury_deposit",
            Self::TreasuryWithdrawal { .. } => "treasury_withdrawal",
            Self::BuybackToggled { .. } => "buyback_toggled",
            Self::PauseSet { .. } => "pause_set",
            Self::MinTreasuryBalanceSet { .. } => "min_treasury_balance_set",
            Self::OracleUpdated { .. } => "oracle_updated",
            Self::VrfAuthorityUpdated { .. } => "vrf_authority_updated",
            Self::AuthorityTransferInitiated { .. } => "authority_transfer_initiated",
            Self::AuthorityTransferCancelled { .. } => "authority_transfer_cancelled",
            Self::AuthorityTransferred { .. } => "authority_transferred",
        }
    }
}

/// A sequenced entry of the append-only event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Starts at 0, no gaps.
    pub sequence: u64,
    /// Ledger time of the commit.
    pub at: i64,
    pub event: ProtocolEvent,
}
