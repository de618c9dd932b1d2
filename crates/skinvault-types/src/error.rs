//! Error types for the SkinVault protocol.
//!
//! Every rejected precondition maps to exactly one variant. All errors use
//! the `SV_ERR_` prefix so rejections are easy to grep in logs.
//! Codes are grouped by subsystem:
//! - 1xx: Authority / admin
//! - 2xx: Batch registry and Merkle verification
//! - 3xx: Box lifecycle and randomness
//! - 4xx: Price oracle
//! - 5xx: Treasury and buyback
//! - 6xx: External collaborators
//! - 9xx: Internal

use thiserror::Error;

use crate::{Address, BatchId, BoxId, InventoryHash};

/// Central error enum for all SkinVault operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkinVaultError {
    // =================================================================
    // Authority / Admin (1xx)
    // =================================================================
    /// The caller is not allowed to perform this operation.
    #[error("SV_ERR_100: Unauthorized caller {0}")]
    Unauthorized(Address),

    /// The protocol has not been initialized yet.
    #[error("SV_ERR_101: Protocol not initialized")]
    NotInitialized,

    /// `initialize` was called on an already-initialized protocol.
    #[error("SV_ERR_102: Protocol already initialized")]
    AlreadyInitialized,

    /// User operations are halted by the emergency pause.
    #[error("SV_ERR_103: Protocol is paused")]
    ProtocolPaused,

    // =================================================================
    // Batch / Merkle (2xx)
    // =================================================================
    /// The batch does not exist, or its parameters are malformed.
    #[error("SV_ERR_200: Invalid batch {batch_id}: {reason}")]
    InvalidBatchId { batch_id: BatchId, reason: String },

    /// A batch with this ID was already published.
    #[error("SV_ERR_201: Batch already exists: {0}")]
    BatchAlreadyExists(BatchId),

    /// The proof does not recompute to the batch Merkle root.
    #[error("SV_ERR_202: Invalid Merkle proof for {0}")]
    InvalidMerkleProof(InventoryHash),

    /// The proof has more levels than the configured maximum depth.
    #[error("SV_ERR_203: Merkle proof depth {depth} exceeds maximum {max}")]
    MerkleProofTooDeep { depth: usize, max: usize },

    /// The inventory item is already assigned, or the box already holds one.
    #[error("SV_ERR_204: Inventory already assigned: {0}")]
    InventoryAlreadyAssigned(InventoryHash),

    // =================================================================
    // Box lifecycle / VRF (3xx)
    // =================================================================
    /// The caller does not own the box.
    #[error("SV_ERR_300: Box {box_id} is not owned by {caller}")]
    NotBoxOwner { box_id: BoxId, caller: Address },

    /// No box record exists for this asset.
    #[error("SV_ERR_301: Box not found: {0}")]
    BoxNotFound(BoxId),

    /// A box record already exists for this asset.
    #[error("SV_ERR_302: Box already exists: {0}")]
    BoxAlreadyExists(BoxId),

    /// The metadata URI is empty or too long.
    #[error("SV_ERR_303: Invalid metadata: {reason}")]
    InvalidMetadata { reason: String },

    /// The box has already been opened.
    #[error("SV_ERR_304: Box already opened: {0}")]
    AlreadyOpened(BoxId),

    /// The box has not been opened yet.
    #[error("SV_ERR_305: Box not opened yet: {0}")]
    NotOpenedYet(BoxId),

    /// The requested pool size is outside the accepted range.
    #[error("SV_ERR_306: Invalid pool size {pool_size} (max {max})")]
    InvalidPoolSize { pool_size: u64, max: u64 },

    /// No matching randomness request, or the randomness is degenerate.
    #[error("SV_ERR_307: VRF request not fulfilled or invalid: {reason}")]
    VrfNotFulfilled { reason: String },

    /// A randomness request for this box is already in flight.
    #[error("SV_ERR_308: VRF request already pending for {0}")]
    VrfRequestPending(BoxId),

    /// The pending randomness request has not timed out yet.
    #[error("SV_ERR_309: VRF request for {box_id} cannot be cancelled before {expires_at}")]
    VrfRequestNotExpired { box_id: BoxId, expires_at: i64 },

    /// The box has no inventory assigned.
    #[error("SV_ERR_310: No inventory assigned to {0}")]
    InventoryNotAssigned(BoxId),

    /// The box has already been sold back.
    #[error("SV_ERR_311: Box already redeemed: {0}")]
    AlreadyRedeemed(BoxId),

    // =================================================================
    // Oracle (4xx)
    // =================================================================
    /// No oracle key has been configured.
    #[error("SV_ERR_400: Oracle public key not set")]
    OracleNotSet,

    /// A key or signature is not well-formed.
    #[error("SV_ERR_401: Invalid signature format: {reason}")]
    InvalidSignature { reason: String },

    /// The quote signature does not verify against the oracle key.
    #[error("SV_ERR_402: Price oracle signature verification failed for {0}")]
    OracleSignatureInvalid(InventoryHash),

    /// The timestamp is implausible or not newer than the stored one.
    #[error("SV_ERR_403: Invalid timestamp {timestamp}: {reason}")]
    InvalidTimestamp { timestamp: i64, reason: String },

    /// Prices must be strictly positive.
    #[error("SV_ERR_404: Invalid price for {0}")]
    InvalidPrice(InventoryHash),

    /// The price is missing or older than the staleness window.
    #[error("SV_ERR_405: Price stale or missing for {0}")]
    PriceStale(InventoryHash),

    // =================================================================
    // Treasury / Buyback (5xx)
    // =================================================================
    /// Buybacks are switched off.
    #[error("SV_ERR_500: Buyback is currently disabled")]
    BuybackDisabled,

    /// The circuit breaker: the operation would leave the treasury below its floor.
    #[error("SV_ERR_501: Treasury insufficient: balance {balance}, requested {requested}, floor {floor}")]
    TreasuryInsufficient {
        balance: u64,
        requested: u64,
        floor: u64,
    },

    /// The oracle price is below the seller's minimum.
    #[error("SV_ERR_502: Slippage exceeded: price {price} below minimum {min_price}")]
    SlippageExceeded { price: u64, min_price: u64 },

    /// The payment-ledger account cannot cover the debit.
    #[error("SV_ERR_503: Insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: u64,
        available: u64,
    },

    /// Supply conservation check failed. Critical.
    #[error("SV_ERR_504: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Collaborators (6xx)
    // =================================================================
    /// The asset custody layer refused an action.
    #[error("SV_ERR_600: Custody rejected: {reason}")]
    CustodyRejected { reason: String },

    // =================================================================
    // Internal (9xx)
    // =================================================================
    /// Checked arithmetic overflowed or underflowed.
    #[error("SV_ERR_900: Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    /// Configuration is invalid.
    #[error("SV_ERR_901: Configuration error: {0}")]
    Configuration(String),
}

impl SkinVaultError {
    /// Numeric code, e.g. `204` for [`SkinVaultError::InventoryAlreadyAssigned`].
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 100,
            Self::NotInitialized => 101,
            Self::AlreadyInitialized => 102,
            Self::ProtocolPaused => 103,
            Self::InvalidBatchId { .. } => 200,
            Self::BatchAlreadyExists(_) => 201,
            Self::InvalidMerkleProof(_) => 202,
            Self::MerkleProofTooDeep { .. } => 203,
            Self::InventoryAlreadyAssigned(_) => 204,
            Self::NotBoxOwner { .. } => 300,
            Self::BoxNotFound(_) => 301,
            Self::BoxAlreadyExists(_) => 302,
            Self::InvalidMetadata { .. } => 303,
            Self::AlreadyOpened(_) => 304,
            Self::NotOpenedYet(_) => 305,
            Self::InvalidPoolSize { .. } => 306,
            Self::VrfNotFulfilled { .. } => 307,
            Self::VrfRequestPending(_) => 308,
            Self::VrfRequestNotExpired { .. } => 309,
            Self::InventoryNotAssigned(_) => 310,
            Self::AlreadyRedeemed(_) => 311,
            Self::OracleNotSet => 400,
            Self::InvalidSignature { .. } => 401,
            Self::OracleSignatureInvalid(_) => 402,
            Self::InvalidTimestamp { .. } => 403,
            Self::InvalidPrice(_) => 404,
            Self::PriceStale(_) => 405,
            Self::BuybackDisabled => 500,
            Self::TreasuryInsufficient { .. } => 501,
            Self::SlippageExceeded { .. } => 502,
            Self::InsufficientBalance { .. } => 503,
            Self::SupplyInvariantViolation { .. } => 504,
            Self::CustodyRejected { .. } => 600,
            Self::ArithmeticOverflow { .. } => 900,
            Self::Configuration(_) => 901,
        }
    }

    /// Overflow while updating `context`.
    #[must_use]
    pub fn overflow(context: &'static str) -> Self {
        Self::ArithmeticOverflow { context }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SkinVaultError>;
