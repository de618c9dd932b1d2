//! System-wide constants for the SkinVault protocol.

/// Decimal places of the payment asset (USDC).
pub const PAYMENT_DECIMALS: u32 = 6;

/// One whole unit of the payment asset in base units.
pub const PAYMENT_UNIT: u64 = 1_000_000;

/// Basis-point denominator (10_000 bps = 100%).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default buyback spread fee (100 bps = 1%).
pub const DEFAULT_SPREAD_FEE_BPS: u64 = 100;

/// Default maximum age of a price before it is considered stale (seconds).
pub const DEFAULT_MAX_PRICE_AGE_SECS: i64 = 300;

/// Default tolerance for oracle timestamps ahead of ledger time (seconds).
pub const DEFAULT_MAX_FUTURE_SKEW_SECS: i64 = 30;

/// Default tolerance for snapshot times ahead of ledger time (seconds).
pub const DEFAULT_SNAPSHOT_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Default maximum Merkle proof length accepted by `assign`.
pub const DEFAULT_MAX_MERKLE_PROOF_DEPTH: usize = 32;

/// Default upper bound on `pool_size` for `open_box` (no bound beyond `u64`).
pub const DEFAULT_MAX_POOL_SIZE: u64 = u64::MAX;

/// Default maximum metadata URI length in bytes.
pub const DEFAULT_MAX_METADATA_URI_LEN: usize = 200;

/// Default time after which a requester may cancel an unfulfilled VRF request (seconds).
pub const DEFAULT_VRF_REQUEST_TIMEOUT_SECS: i64 = 3_600;

/// Default treasury floor (1000 USDC).
pub const DEFAULT_MIN_TREASURY_BALANCE: u64 = 1_000 * PAYMENT_UNIT;

/// Domain separator for record address derivation.
pub const ADDRESS_DOMAIN: &[u8] = b"skinvault:addr:v1:";

/// Record address seeds.
pub const GLOBAL_SEED: &[u8] = b"global";
pub const BATCH_SEED: &[u8] = b"batch";
pub const BOX_SEED: &[u8] = b"box";
pub const VRF_PENDING_SEED: &[u8] = b"vrf_pending";
pub const INVENTORY_SEED: &[u8] = b"inventory";
pub const PRICE_SEED: &[u8] = b"price";
pub const TREASURY_SEED: &[u8] = b"treasury";

/// Length of the signed oracle message: hash (32) + price (8) + timestamp (8).
pub const PRICE_MESSAGE_LEN: usize = 48;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol name.
pub const PROTOCOL_NAME: &str = "SkinVault";
