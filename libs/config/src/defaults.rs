//! Engine defaults
//!
//! Default values used when a configuration file leaves a setting out.

/// Swap fee as a fraction of SCALE (0.1%)
pub const DEFAULT_SWAP_FEE: u64 = 1_000;

/// Shares minted for the first-ever deposit into a pool
pub const AMOUNT_LP_DEPLOYER: u64 = 1_000_000_000;

/// Total share-token supply created at bootstrap and held by the pool
pub const DEFAULT_SHARE_SUPPLY: u64 = 10_000_000_000_000_000;

/// Allowed distance between the weight sum and SCALE
pub const DEFAULT_WEIGHT_TOLERANCE: u64 = 1;

/// Default tracing filter directive
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Prefix for environment variable overrides (`WAMM_ENGINE__SWAP_FEE=...`)
pub const ENV_PREFIX: &str = "WAMM";
