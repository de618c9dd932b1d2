//! The protocol singleton.

use serde::{Deserialize, Serialize};

use crate::{Address, OraclePubkey, Result, SkinVaultError};

/// Singleton record: authority, runtime switches and protocol-wide counters.
///
/// Created once by `initialize`, never destroyed. Only admin operations
/// touch the switches; the counters are bumped by the operation that owns
/// the corresponding event (mint, buyback, publish).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// May perform admin operations.
    pub authority: Address,
    /// Named by `initiate_authority_transfer`; must accept to take over.
    pub pending_authority: Option<Address>,
    /// Key that signs price quotes. `None` until configured.
    pub oracle_pubkey: Option<OraclePubkey>,
    /// The only caller allowed to deliver randomness.
    pub vrf_authority: Address,
    /// Identifier of the payment asset (e.g. the USDC mint).
    pub payment_asset: String,
    pub buyback_enabled: bool,
    pub paused: bool,
    /// Circuit-breaker floor for the treasury.
    pub min_treasury_balance: u64,
    pub current_batch_count: u64,
    pub total_boxes_minted: u64,
    pub total_buybacks: u64,
    /// Sum of all buyback payouts.
    pub total_buyback_volume: u64,
}

impl GlobalConfig {
    /// Fresh configuration: buyback on, not paused, counters at zero.
    #[must_use]
    pub fn new(
        authority: Address,
        vrf_authority: Address,
        oracle_pubkey: Option<OraclePubkey>,
        payment_asset: impl Into<String>,
        min_treasury_balance: u64,
    ) -> Self {
        Self {
            authority,
            pending_authority: None,
            oracle_pubkey,
            vrf_authority,
            payment_asset: payment_asset.into(),
            buyback_enabled: true,
            paused: false,
            min_treasury_balance,
            current_batch_count: 0,
            total_boxes_minted: 0,
            total_buybacks: 0,
            total_buyback_volume: 0,
        }
    }

    /// # Errors
    /// [`SkinVaultError::Unauthorized`] unless `caller` is the authority.
    pub fn require_authority(&self, caller: Address) -> Result<()> {
        if caller == self.authority {
            Ok(())
        } else {
            Err(SkinVaultError::Unauthorized(caller))
        }
    }

    /// # Errors
    /// [`SkinVaultError::ProtocolPaused`] while the emergency pause is on.
    pub fn require_not_paused(&self) -> Result<()> {
        if self.paused {
            Err(SkinVaultError::ProtocolPaused)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GlobalConfig {
        GlobalConfig::new(Address([1; 32]), Address([2; 32]), None, "USDC", 400)
    }

    #[test]
    fn new_config_defaults() {
        let cfg = config();
        assert!(cfg.buyback_enabled);
        assert!(!cfg.paused);
        assert!(cfg.pending_authority.is_none());
        assert_eq!(cfg.total_boxes_minted, 0);
    }

    #[test]
    fn authority_check() {
        let cfg = config();
        assert!(cfg.require_authority(Address([1; 32])).is_ok());
        let err = cfg.require_authority(Address([9; 32])).unwrap_err();
        assert!(matches!(err, SkinVaultError::Unauthorized(a) if a == Address([9; 32])));
    }

    #[test]
    fn pause_check() {
        let mut cfg = config();
        assert!(cfg.require_not_paused().is_ok());
        cfg.paused = true;
        assert_eq!(cfg.require_not_paused(), Err(SkinVaultError::ProtocolPaused));
    }
}
