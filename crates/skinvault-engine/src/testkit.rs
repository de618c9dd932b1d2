//! Test fixture shared by the engine's unit and integration tests.
//!
//! Compiled for `cfg(test)` and behind the `test-helpers` feature. Every
//! helper unwraps: a failing setup step is a broken test, not a case to
//! handle.

use std::sync::Arc;

use skinvault_core::{MerkleTree, OracleSigner, inventory_leaf};
use skinvault_ledger::{AssetCustody, ManualClock, RecordingCustody};
use skinvault_types::{
    Address, BatchId, BoxId, InventoryHash, PriceRecord, ProtocolConfig, Result,
};

use crate::Vault;

pub const START: i64 = 1_000;
pub const FLOOR: u64 = 400;
pub const ITEMS: usize = 4;

/// Randomness whose big-endian value is `n`.
pub fn randomness(n: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&n.to_be_bytes());
    bytes
}

fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(START))
}

/// An initialized vault on a manual clock at `START` and an inventory ready
/// to publish. Defaults to `ITEMS` items and treasury floor `FLOOR`.
pub struct Harness {
    pub vault: Arc<Vault>,
    pub clock: Arc<ManualClock>,
    pub custody: Arc<RecordingCustody>,
    pub authority: Address,
    pub vrf: Address,
    pub alice: Address,
    pub bob: Address,
    pub oracle: OracleSigner,
    pub items: Vec<InventoryHash>,
    pub tree: MerkleTree,
}

impl Harness {
    pub fn new() -> Self {
        Self::assemble(ProtocolConfig::default(), start_clock(), None, true, ITEMS, FLOOR)
    }

    pub fn without_oracle() -> Self {
        Self::assemble(ProtocolConfig::default(), start_clock(), None, false, ITEMS, FLOOR)
    }

    /// [`Harness::new`] with the inventory published as batch 1.
    pub fn with_batch() -> Self {
        let h = Self::new();
        h.publish(BatchId(1));
        h
    }

    /// `items` items published as batch 1, treasury floor `floor`.
    pub fn with_inventory(items: usize, floor: u64) -> Self {
        let h = Self::assemble(ProtocolConfig::default(), start_clock(), None, true, items, floor);
        h.publish(BatchId(1));
        h
    }

    /// `custody` replaces the recording custody inside the vault; the
    /// `custody` field then sees no burns.
    pub fn build(
        config: ProtocolConfig,
        clock: Arc<ManualClock>,
        custody: Option<Arc<dyn AssetCustody>>,
        with_oracle: bool,
    ) -> Self {
        Self::assemble(config, clock, custody, with_oracle, ITEMS, FLOOR)
    }

    fn assemble(
        config: ProtocolConfig,
        clock: Arc<ManualClock>,
        custody: Option<Arc<dyn AssetCustody>>,
        with_oracle: bool,
        item_count: usize,
        floor: u64,
    ) -> Self {
        let recording = Arc::new(RecordingCustody::default());
        let vault_custody: Arc<dyn AssetCustody> = match custody {
            Some(custody) => custody,
            None => recording.clone(),
        };
        let vault = Vault::new(config, clock.clone(), vault_custody).unwrap();

        let authority = Address::random();
        let vrf = Address::random();
        let oracle = OracleSigner::generate();
        vault
            .initialize(
                authority,
                "USDC",
                with_oracle.then(|| oracle.pubkey()),
                vrf,
                Some(floor),
            )
            .unwrap();

        let items: Vec<InventoryHash> = (1..=item_count)
            .map(|i| inventory_leaf(&format!("item-{i}"), &format!("{{\"float\":0.0{i}}}")))
            .collect();
        let tree = MerkleTree::from_inventory(&items).unwrap();

        Self {
            vault: Arc::new(vault),
            clock,
            custody: recording,
            authority,
            vrf,
            alice: Address::random(),
            bob: Address::random(),
            oracle,
            items,
            tree,
        }
    }

    /// Inventory size, which is also the pool size boxes open with.
    pub fn pool(&self) -> u64 {
        u64::try_from(self.items.len()).unwrap()
    }

    pub fn publish(&self, batch_id: BatchId) {
        self.vault
            .publish_merkle_root(self.authority, batch_id, self.tree.root(), 900, self.pool())
            .unwrap();
    }

    /// Mint a box in batch 1 for `owner`.
    pub fn mint(&self, owner: Address) -> BoxId {
        let id = BoxId::random();
        self.vault
            .mint_box(owner, BatchId(1), id, "ipfs://box")
            .unwrap();
        id
    }

    /// Mint, open over the whole inventory and deliver randomness `n`.
    /// Returns the box and its random index.
    pub fn open_and_draw(&self, owner: Address, n: u64) -> (BoxId, u64) {
        let id = self.mint(owner);
        let request = self.vault.open_box(owner, id, self.pool()).unwrap();
        let index = self
            .vault
            .vrf_callback(self.vrf, id, request, randomness(n))
            .unwrap();
        (id, index)
    }

    pub fn opened_box(&self, owner: Address, n: u64) -> BoxId {
        self.open_and_draw(owner, n).0
    }

    /// Open a box and assign the item its random index selects.
    pub fn assigned_box(&self, owner: Address, n: u64) -> BoxId {
        let (id, index) = self.open_and_draw(owner, n);
        let item = self.items[usize::try_from(index).unwrap()];
        self.vault
            .assign(owner, id, item, &self.proof(&item), None)
            .unwrap();
        id
    }

    pub fn proof(&self, item: &InventoryHash) -> Vec<[u8; 32]> {
        self.tree.proof(&item.0).unwrap()
    }

    /// Relay a quote signed by the harness oracle.
    pub fn quote(&self, item: InventoryHash, price: u64, timestamp: i64) -> Result<PriceRecord> {
        let sig = self.oracle.sign_quote(&item, price, timestamp);
        self.vault.set_price_signed(item, price, timestamp, &sig)
    }

    /// Fund the treasury with `amount` via a deposit from the authority.
    pub fn fund_treasury(&self, amount: u64) {
        self.vault.fund_account(self.authority, amount).unwrap();
        self.vault.deposit_treasury(self.authority, amount).unwrap();
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
