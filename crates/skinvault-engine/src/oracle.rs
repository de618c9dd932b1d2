//! Price Oracle Ledger.
//!
//! Anyone may relay a quote; only the oracle's ed25519 signature makes it
//! count. Quotes are checked for plausibility against ledger time before the
//! signature is verified, and must be strictly newer than the stored quote
//! for the same item.

use skinvault_core::{check_quote_timestamp, verify_quote};
use skinvault_types::{InventoryHash, PriceRecord, ProtocolEvent, Result, SkinVaultError};
use tracing::info;

use crate::Vault;

impl Vault {
    /// Record an oracle-signed price for `item`. Open to any relayer.
    ///
    /// Runs while paused so prices stay fresh for when buybacks resume.
    ///
    /// # Errors
    /// - [`SkinVaultError::OracleNotSet`] before an oracle key is configured
    /// - [`SkinVaultError::InvalidPrice`] for a zero item or zero price
    /// - [`SkinVaultError::InvalidTimestamp`] for an implausible timestamp or
    ///   one not newer than the stored quote
    /// - [`SkinVaultError::InvalidSignature`], [`SkinVaultError::OracleSignatureInvalid`]
    pub fn set_price_signed(
        &self,
        item: InventoryHash,
        price: u64,
        timestamp: i64,
        signature: &[u8],
    ) -> Result<PriceRecord> {
        let oracle = self
            .global_snapshot()?
            .oracle_pubkey
            .ok_or(SkinVaultError::OracleNotSet)?;
        if item.is_zero() || price == 0 {
            return Err(SkinVaultError::InvalidPrice(item));
        }
        let now = self.now();
        check_quote_timestamp(
            timestamp,
            now,
            self.config.max_future_skew_secs,
            self.config.max_price_age_secs,
        )?;
        verify_quote(&oracle, &item, price, timestamp, signature)?;

        let record = self.prices.upsert(item, |current| {
            let update_count = match current {
                Some(prev) if timestamp <= prev.timestamp => {
                    return Err(SkinVaultError::InvalidTimestamp {
                        timestamp,
                        reason: format!("not newer than stored quote at {}", prev.timestamp),
                    });
                }
                Some(prev) => prev
                    .update_count
                    .checked_add(1)
                    .ok_or(SkinVaultError::overflow("price update_count"))?,
                None => 1,
            };
            self.emit(ProtocolEvent::PriceSet {
                inventory_hash: item,
                price,
                timestamp,
                update_count,
            });
            Ok(PriceRecord {
                inventory_hash: item,
                price,
                timestamp,
                signing_oracle: oracle,
                update_count,
            })
        })?;

        info!(
            item = %item,
            price = %skinvault_types::amount::to_decimal(price),
            timestamp,
            update_count = record.update_count,
            "Price updated"
        );
        Ok(record)
    }
}
