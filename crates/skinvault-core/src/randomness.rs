//! Reduction of provider randomness to a pool index.
//!
//! The 32 randomness bytes are read as one big-endian 256-bit integer and
//! reduced modulo the pool size. The result carries a modulo bias of at
//! most `pool_size / 2^256`, which is negligible for any `u64` pool.

use skinvault_types::{Result, SkinVaultError};

/// Reject randomness that is obviously not the output of a VRF.
///
/// # Errors
/// [`SkinVaultError::VrfNotFulfilled`] for all-zero or all-`0xFF` bytes.
pub fn validate_randomness(randomness: &[u8; 32]) -> Result<()> {
    if randomness.iter().all(|&b| b == 0) {
        return Err(SkinVaultError::VrfNotFulfilled {
            reason: "randomness is all zeros".to_string(),
        });
    }
    if randomness.iter().all(|&b| b == 0xFF) {
        return Err(SkinVaultError::VrfNotFulfilled {
            reason: "randomness is all 0xFF".to_string(),
        });
    }
    Ok(())
}

/// `randomness mod pool_size`, with `randomness` as a big-endian 256-bit integer.
///
/// # Errors
/// [`SkinVaultError::InvalidPoolSize`] if `pool_size` is zero.
pub fn reduce_to_index(randomness: &[u8; 32], pool_size: u64) -> Result<u64> {
    if pool_size == 0 {
        return Err(SkinVaultError::InvalidPoolSize {
            pool_size,
            max: u64::MAX,
        });
    }
    let modulus = u128::from(pool_size);
    // Horner's rule; the accumulator stays below 2^72.
    let rem = randomness
        .iter()
        .fold(0u128, |acc, &byte| ((acc << 8) | u128::from(byte)) % modulus);
    u64::try_from(rem).map_err(|_| SkinVaultError::overflow("random index"))
}
