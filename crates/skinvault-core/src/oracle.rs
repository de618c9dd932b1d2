//! Signed price quotes.
//!
//! The oracle signs exactly 48 bytes:
//!
//! ```text
//! inventory_hash (32) ‖ price (u64 LE, 8) ‖ timestamp (i64 LE, 8)
//! ```
//!
//! Verification uses ed25519 in strict mode (no small-order keys, no
//! malleable signatures).

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use skinvault_types::constants::PRICE_MESSAGE_LEN;
use skinvault_types::{InventoryHash, OraclePubkey, Result, SkinVaultError};

/// The canonical bytes the oracle signs for a quote.
#[must_use]
pub fn price_message(item: &InventoryHash, price: u64, timestamp: i64) -> [u8; PRICE_MESSAGE_LEN] {
    let mut msg = [0u8; PRICE_MESSAGE_LEN];
    msg[..32].copy_from_slice(item.as_bytes());
    msg[32..40].copy_from_slice(&price.to_le_bytes());
    msg[40..].copy_from_slice(&timestamp.to_le_bytes());
    msg
}

/// Decode an oracle key, rejecting bytes that are not a valid curve point.
pub fn parse_oracle_key(key: &OraclePubkey) -> Result<VerifyingKey> {
    VerifyingKey::from_bytes(&key.0).map_err(|e| SkinVaultError::InvalidSignature {
        reason: format!("oracle key does not decode: {e}"),
    })
}

/// Verify a quote signature against the configured oracle key.
///
/// # Errors
/// - [`SkinVaultError::InvalidSignature`] if the key or signature is malformed
/// - [`SkinVaultError::OracleSignatureInvalid`] if verification fails
pub fn verify_quote(
    oracle: &OraclePubkey,
    item: &InventoryHash,
    price: u64,
    timestamp: i64,
    signature: &[u8],
) -> Result<()> {
    let key = parse_oracle_key(oracle)?;
    let sig_bytes: [u8; 64] =
        signature
            .try_into()
            .map_err(|_| SkinVaultError::InvalidSignature {
                reason: format!("expected 64 signature bytes, got {}", signature.len()),
            })?;
    let sig = Signature::from_bytes(&sig_bytes);
    let msg = price_message(item, price, timestamp);
    key.verify_strict(&msg, &sig).map_err(|_| {
        tracing::warn!(
            item = %item,
            price,
            timestamp,
            sig = %hex::encode(&sig_bytes[..8]),
            "Oracle signature rejected"
        );
        SkinVaultError::OracleSignatureInvalid(*item)
    })
}

/// Signing side of the oracle feed.
///
/// The engine never holds one; price publishers and tests do.
pub struct OracleSigner {
    key: SigningKey,
}

impl OracleSigner {
    #[must_use]
    pub fn from_secret(secret: [u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(&secret),
        }
    }

    #[must_use]
    pub fn pubkey(&self) -> OraclePubkey {
        OraclePubkey(self.key.verifying_key().to_bytes())
    }

    #[must_use]
    pub fn sign_quote(&self, item: &InventoryHash, price: u64, timestamp: i64) -> [u8; 64] {
        self.key
            .sign(&price_message(item, price, timestamp))
            .to_bytes()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl OracleSigner {
    /// A signer with a fresh random key. **Never use in production.**
    pub fn generate() -> Self {
        Self {
            key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> InventoryHash {
        InventoryHash([0x11; 32])
    }

    #[test]
    fn message_layout() {
        let msg = price_message(&item(), 0x0102, -1);
        assert_eq!(&msg[..32], &[0x11; 32]);
        assert_eq!(&msg[32..40], &[0x02, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&msg[40..], &[0xFF; 8]);
    }

    #[test]
    fn valid_quote_verifies() {
        let signer = OracleSigner::generate();
        let sig = signer.sign_quote(&item(), 100, 1_000);
        assert!(verify_quote(&signer.pubkey(), &item(), 100, 1_000, &sig).is_ok());
    }

    #[test]
    fn altered_fields_fail() {
        let signer = OracleSigner::generate();
        let sig = signer.sign_quote(&item(), 100, 1_000);
        let pk = signer.pubkey();
        for (price, ts) in [(101, 1_000), (100, 1_001)] {
            assert_eq!(
                verify_quote(&pk, &item(), price, ts, &sig),
                Err(SkinVaultError::OracleSignatureInvalid(item()))
            );
        }
        assert!(verify_quote(&pk, &InventoryHash([0x12; 32]), 100, 1_000, &sig).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let signer = OracleSigner::generate();
        let other = OracleSigner::generate();
        let sig = signer.sign_quote(&item(), 100, 1_000);
        assert!(matches!(
            verify_quote(&other.pubkey(), &item(), 100, 1_000, &sig),
            Err(SkinVaultError::OracleSignatureInvalid(_))
        ));
    }

    #[test]
    fn short_signature_is_malformed() {
        let signer = OracleSigner::generate();
        assert!(matches!(
            verify_quote(&signer.pubkey(), &item(), 100, 1_000, &[0u8; 10]),
            Err(SkinVaultError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn deterministic_secret_gives_stable_key() {
        let a = OracleSigner::from_secret([7; 32]);
        let b = OracleSigner::from_secret([7; 32]);
        assert_eq!(a.pubkey(), b.pubkey());
        assert!(parse_oracle_key(&a.pubkey()).is_ok());
    }
}
