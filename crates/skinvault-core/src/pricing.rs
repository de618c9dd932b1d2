//! Buyback payout math and price freshness rules.
//!
//! All arithmetic is checked. The spread fee is truncated toward zero, so
//! the seller is never charged more than `price × bps / 10_000`.

use skinvault_types::constants::BPS_DENOMINATOR;
use skinvault_types::{InventoryHash, PriceRecord, Result, SkinVaultError};

/// Fee kept by the protocol on a buyback at `price`.
pub fn spread_fee(price: u64, spread_fee_bps: u64) -> Result<u64> {
    let fee = u128::from(price)
        .checked_mul(u128::from(spread_fee_bps))
        .ok_or(SkinVaultError::overflow("spread fee"))?
        / u128::from(BPS_DENOMINATOR);
    u64::try_from(fee).map_err(|_| SkinVaultError::overflow("spread fee"))
}

/// `price − price × spread_fee_bps / 10_000`.
pub fn compute_payout(price: u64, spread_fee_bps: u64) -> Result<u64> {
    let fee = spread_fee(price, spread_fee_bps)?;
    price
        .checked_sub(fee)
        .ok_or(SkinVaultError::overflow("buyback payout"))
}

/// Is a quote taken at `timestamp` still usable at `now`?
#[must_use]
pub fn is_fresh(timestamp: i64, now: i64, max_age_secs: i64) -> bool {
    now.saturating_sub(timestamp) <= max_age_secs
}

/// Plausibility of an incoming oracle timestamp.
///
/// # Errors
/// [`SkinVaultError::InvalidTimestamp`] if the timestamp is non-positive,
/// too far in the future, or already older than `max_age_secs`.
pub fn check_quote_timestamp(
    timestamp: i64,
    now: i64,
    max_future_skew_secs: i64,
    max_age_secs: i64,
) -> Result<()> {
    let reject = |reason: &str| SkinVaultError::InvalidTimestamp {
        timestamp,
        reason: reason.to_string(),
    };
    if timestamp <= 0 {
        return Err(reject("must be positive"));
    }
    if timestamp > now.saturating_add(max_future_skew_secs) {
        return Err(reject("too far in the future"));
    }
    if !is_fresh(timestamp, now, max_age_secs) {
        return Err(reject("older than the staleness window"));
    }
    Ok(())
}

/// The price to buy back `item` at, if a fresh quote exists.
///
/// # Errors
/// [`SkinVaultError::PriceStale`] if there is no quote or it is too old.
pub fn fresh_price(
    item: &InventoryHash,
    record: Option<&PriceRecord>,
    now: i64,
    max_age_secs: i64,
) -> Result<u64> {
    match record {
        Some(rec) if is_fresh(rec.timestamp, now, max_age_secs) => Ok(rec.price),
        _ => Err(SkinVaultError::PriceStale(*item)),
    }
}
