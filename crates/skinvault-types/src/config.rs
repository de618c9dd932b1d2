//! Protocol-level configuration.
//!
//! These are the knobs fixed at deployment: fee, freshness windows and
//! compute bounds. Runtime-adjustable parameters (pause, buyback switch,
//! treasury floor, oracle key) live in [`crate::GlobalConfig`] instead.

use serde::{Deserialize, Serialize};

use crate::{constants, Result, SkinVaultError};

/// Deployment parameters of a SkinVault instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Spread kept by the protocol on every buyback, in basis points.
    pub spread_fee_bps: u64,
    /// A price older than this (seconds) is stale for buybacks and ingestion.
    pub max_price_age_secs: i64,
    /// How far ahead of ledger time an oracle timestamp may be (seconds).
    pub max_future_skew_secs: i64,
    /// How far ahead of ledger time a snapshot time may be (seconds).
    pub snapshot_future_tolerance_secs: i64,
    /// Longest Merkle proof accepted by `assign`.
    pub max_merkle_proof_depth: usize,
    /// Largest `pool_size` accepted by `open_box`.
    pub max_pool_size: u64,
    /// Longest metadata URI accepted by `mint_box`, in bytes.
    pub max_metadata_uri_len: usize,
    /// Age after which the requester may cancel an unfulfilled VRF request.
    pub vrf_request_timeout_secs: i64,
    /// Treasury floor used by `initialize` when none is given.
    pub default_min_treasury_balance: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            spread_fee_bps: constants::DEFAULT_SPREAD_FEE_BPS,
            max_price_age_secs: constants::DEFAULT_MAX_PRICE_AGE_SECS,
            max_future_skew_secs: constants::DEFAULT_MAX_FUTURE_SKEW_SECS,
            snapshot_future_tolerance_secs: constants::DEFAULT_SNAPSHOT_FUTURE_TOLERANCE_SECS,
            max_merkle_proof_depth: constants::DEFAULT_MAX_MERKLE_PROOF_DEPTH,
            max_pool_size: constants::DEFAULT_MAX_POOL_SIZE,
            max_metadata_uri_len: constants::DEFAULT_MAX_METADATA_URI_LEN,
            vrf_request_timeout_secs: constants::DEFAULT_VRF_REQUEST_TIMEOUT_SECS,
            default_min_treasury_balance: constants::DEFAULT_MIN_TREASURY_BALANCE,
        }
    }
}

impl ProtocolConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| SkinVaultError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the engine cannot operate under.
    pub fn validate(&self) -> Result<()> {
        if self.spread_fee_bps > constants::BPS_DENOMINATOR {
            return Err(SkinVaultError::Configuration(format!(
                "spread_fee_bps {} exceeds {}",
                self.spread_fee_bps,
                constants::BPS_DENOMINATOR
            )));
        }
        if self.max_price_age_secs <= 0 {
            return Err(SkinVaultError::Configuration(
                "max_price_age_secs must be positive".to_string(),
            ));
        }
        if self.max_future_skew_secs < 0 || self.snapshot_future_tolerance_secs < 0 {
            return Err(SkinVaultError::Configuration(
                "future tolerances must not be negative".to_string(),
            ));
        }
        if self.max_merkle_proof_depth == 0 {
            return Err(SkinVaultError::Configuration(
                "max_merkle_proof_depth must be at least 1".to_string(),
            ));
        }
        if self.max_pool_size == 0 {
            return Err(SkinVaultError::Configuration(
                "max_pool_size must be at least 1".to_string(),
            ));
        }
        if self.max_metadata_uri_len == 0 {
            return Err(SkinVaultError::Configuration(
                "max_metadata_uri_len must be at least 1".to_string(),
            ));
        }
        if self.vrf_request_timeout_secs <= 0 {
            return Err(SkinVaultError::Configuration(
                "vrf_request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
