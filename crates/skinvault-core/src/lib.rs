//! # skinvault-core
//!
//! **Pure deterministic primitives for SkinVault.**
//!
//! Nothing in this crate touches state. Every function maps its inputs to
//! the same output on every node:
//!
//! - **Merkle**: sorted-pair SHA-256 trees, proofs and depth-bounded verification
//! - **Randomness**: 256-bit big-endian reduction to a pool index
//! - **Pricing**: spread fee, payout, freshness and timestamp plausibility
//! - **Oracle**: the 48-byte quote message and strict ed25519 verification
//! - **Addressing**: domain-separated record addresses

pub mod address;
pub mod merkle;
pub mod oracle;
pub mod pricing;
pub mod randomness;

pub use merkle::{
    MerkleTree, check_inclusion, hash_pair, inventory_leaf, proof_depth, verify_proof,
};
pub use oracle::{OracleSigner, parse_oracle_key, price_message, verify_quote};
pub use pricing::{check_quote_timestamp, compute_payout, fresh_price, is_fresh, spread_fee};
pub use randomness::{reduce_to_index, validate_randomness};
