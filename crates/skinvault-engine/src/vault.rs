//! The protocol state machine.
//!
//! [`Vault`] owns every record store and exposes the protocol operations as
//! `&self` methods, so one instance can be shared across threads behind an
//! `Arc`. Operations are spread over the sibling modules by component; this
//! module holds construction, initialization, read accessors and the small
//! helpers they share.
//!
//! ## Lock order
//!
//! Operations that touch several records hold their guards in this order
//! and never in reverse:
//!
//! ```text
//! box → vrf_pending → inventory → batch → price → treasury → payment accounts → global
//! ```
//!
//! Brief reads (`get`, `inspect`) release their guard before returning and
//! may happen at any point.

use std::sync::Arc;

use skinvault_core::address;
use skinvault_ledger::{
    AssetCustody, EventLog, LedgerClock, NoopCustody, PaymentLedger, RecordStore, SystemClock,
};
use skinvault_types::{
    Address, Batch, BatchId, BoxId, BoxState, EventRecord, GlobalConfig, InventoryAssignment,
    InventoryHash, OraclePubkey, PriceRecord, ProtocolConfig, ProtocolEvent, RecordAddress,
    Result, SkinVaultError, TreasuryAccount, VrfPending,
};
use tracing::info;

fn global_key(_: &()) -> RecordAddress {
    address::global_address()
}

fn treasury_key(_: &()) -> RecordAddress {
    address::treasury_address()
}

fn batch_key(id: &BatchId) -> RecordAddress {
    address::batch_address(*id)
}

/// A SkinVault instance.
pub struct Vault {
    pub(crate) config: ProtocolConfig,
    pub(crate) clock: Arc<dyn LedgerClock>,
    pub(crate) custody: Arc<dyn AssetCustody>,
    pub(crate) global: RecordStore<(), GlobalConfig>,
    pub(crate) batches: RecordStore<BatchId, Batch>,
    pub(crate) boxes: RecordStore<BoxId, BoxState>,
    pub(crate) vrf_pending: RecordStore<BoxId, VrfPending>,
    pub(crate) assignments: RecordStore<InventoryHash, InventoryAssignment>,
    pub(crate) prices: RecordStore<InventoryHash, PriceRecord>,
    pub(crate) treasury: RecordStore<(), TreasuryAccount>,
    pub(crate) payments: PaymentLedger,
    pub(crate) events: EventLog,
}

impl Vault {
    /// An uninitialized vault. Call [`Vault::initialize`] before anything else.
    ///
    /// # Errors
    /// [`SkinVaultError::Configuration`] if `config` does not validate.
    pub fn new(
        config: ProtocolConfig,
        clock: Arc<dyn LedgerClock>,
        custody: Arc<dyn AssetCustody>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            custody,
            global: RecordStore::new("global", global_key),
            batches: RecordStore::new("batch", batch_key),
            boxes: RecordStore::new("box", address::box_address),
            vrf_pending: RecordStore::new("vrf_pending", address::vrf_pending_address),
            assignments: RecordStore::new("inventory", address::inventory_address),
            prices: RecordStore::new("price", address::price_address),
            treasury: RecordStore::new("treasury", treasury_key),
            payments: PaymentLedger::new(),
            events: EventLog::new(),
        })
    }

    /// Wall-clock time and a custody layer that accepts every burn.
    pub fn with_system_clock(config: ProtocolConfig) -> Result<Self> {
        Self::new(config, Arc::new(SystemClock), Arc::new(NoopCustody))
    }

    /// Create the protocol singleton and an empty treasury.
    ///
    /// `min_treasury_balance` defaults to the configured
    /// `default_min_treasury_balance`.
    ///
    /// # Errors
    /// - [`SkinVaultError::AlreadyInitialized`] on a second call
    /// - [`SkinVaultError::InvalidSignature`] if `oracle_pubkey` does not decode
    pub fn initialize(
        &self,
        authority: Address,
        payment_asset: &str,
        oracle_pubkey: Option<OraclePubkey>,
        vrf_authority: Address,
        min_treasury_balance: Option<u64>,
    ) -> Result<()> {
        if let Some(key) = &oracle_pubkey {
            skinvault_core::parse_oracle_key(key)?;
        }
        let floor = min_treasury_balance.unwrap_or(self.config.default_min_treasury_balance);
        let now = self.now();
        self.global
            .create_with((), || SkinVaultError::AlreadyInitialized, || {
                // Nothing else can hold the treasury guard before the
                // singleton exists.
                self.treasury.upsert((), |_| Ok(TreasuryAccount::default()))?;
                let cfg =
                    GlobalConfig::new(authority, vrf_authority, oracle_pubkey, payment_asset, floor);
                self.events.append(
                    now,
                    ProtocolEvent::Initialized {
                        authority,
                        vrf_authority,
                        payment_asset: payment_asset.to_string(),
                        min_treasury_balance: floor,
                    },
                );
                Ok((cfg, ()))
            })?;
        info!(
            authority = %authority,
            vrf_authority = %vrf_authority,
            payment_asset,
            min_treasury_balance = %skinvault_types::amount::to_decimal(floor),
            "Protocol initialized"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    pub(crate) fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Current singleton, or `NotInitialized`.
    pub(crate) fn global_snapshot(&self) -> Result<GlobalConfig> {
        self.global.get(&()).ok_or(SkinVaultError::NotInitialized)
    }

    pub(crate) fn emit(&self, event: ProtocolEvent) -> u64 {
        self.events.append(self.now(), event)
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn global_config(&self) -> Result<GlobalConfig> {
        self.global_snapshot()
    }

    #[must_use]
    pub fn batch(&self, batch_id: BatchId) -> Option<Batch> {
        self.batches.get(&batch_id)
    }

    #[must_use]
    pub fn box_state(&self, box_id: &BoxId) -> Option<BoxState> {
        self.boxes.get(box_id)
    }

    #[must_use]
    pub fn pending_request(&self, box_id: &BoxId) -> Option<VrfPending> {
        self.vrf_pending.get(box_id)
    }

    #[must_use]
    pub fn assignment(&self, item: &InventoryHash) -> Option<InventoryAssignment> {
        self.assignments.get(item)
    }

    #[must_use]
    pub fn price(&self, item: &InventoryHash) -> Option<PriceRecord> {
        self.prices.get(item)
    }

    pub fn treasury_account(&self) -> Result<TreasuryAccount> {
        self.treasury.get(&()).ok_or(SkinVaultError::NotInitialized)
    }

    /// Storage address of a box record.
    #[must_use]
    pub fn box_address(&self, box_id: &BoxId) -> RecordAddress {
        self.boxes.address(box_id)
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    #[must_use]
    pub fn event_history(&self) -> Vec<EventRecord> {
        self.events.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use skinvault_ledger::ManualClock;

    use super::*;
    use crate::testkit::Harness;

    #[test]
    fn operations_fail_before_initialize() {
        let vault = Vault::new(
            ProtocolConfig::default(),
            Arc::new(ManualClock::new(1_000)),
            Arc::new(NoopCustody),
        )
        .unwrap();
        assert_eq!(vault.global_config(), Err(SkinVaultError::NotInitialized));
        assert_eq!(vault.treasury_account(), Err(SkinVaultError::NotInitialized));
        let err = vault
            .mint_box(Address([1; 32]), BatchId(1), BoxId([1; 32]), "ipfs://x")
            .unwrap_err();
        assert_eq!(err, SkinVaultError::NotInitialized);
    }

    #[test]
    fn initialize_once() {
        let h = Harness::new();
        let err = h
            .vault
            .initialize(h.authority, "USDC", None, h.vrf, None)
            .unwrap_err();
        assert_eq!(err, SkinVaultError::AlreadyInitialized);
        assert_eq!(h.vault.events().len(), 1);
    }

    #[test]
    fn initialize_defaults_floor_from_config() {
        let vault = Vault::new(
            ProtocolConfig::default(),
            Arc::new(ManualClock::new(1_000)),
            Arc::new(NoopCustody),
        )
        .unwrap();
        vault
            .initialize(Address([1; 32]), "USDC", None, Address([2; 32]), None)
            .unwrap();
        let cfg = vault.global_config().unwrap();
        assert_eq!(cfg.min_treasury_balance, 1_000_000_000);
        assert!(cfg.buyback_enabled);
        assert!(!cfg.paused);
        assert!(cfg.oracle_pubkey.is_none());
        assert_eq!(vault.treasury_account().unwrap().balance, 0);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = ProtocolConfig {
            spread_fee_bps: 20_000,
            ..ProtocolConfig::default()
        };
        assert!(matches!(
            Vault::with_system_clock(config),
            Err(SkinVaultError::Configuration(_))
        ));
    }

    #[test]
    fn vault_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Vault>();
    }
}
