//! Pool engine settings
//!
//! Tunables that are fixed for the lifetime of an engine instance. The math
//! constants (`SCALE`, series term counts) are deliberately not configurable.

use crate::defaults::{
    AMOUNT_LP_DEPLOYER, DEFAULT_SHARE_SUPPLY, DEFAULT_SWAP_FEE, DEFAULT_WEIGHT_TOLERANCE,
};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use wamm_types::SCALE;

/// Which weights swap and mint pricing read while a weight schedule is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapWeightMode {
    /// Price against the interpolated weight at the time of the call
    #[default]
    Live,
    /// Price against the stored static weights only; targets take effect
    /// once the schedule is materialised after its end time
    Static,
}

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Swap fee as a fraction of SCALE
    pub swap_fee: u64,
    /// Shares minted when the circulating supply is zero
    pub initial_mint: u64,
    /// Share-token total supply held by the pool at bootstrap
    pub share_supply: u64,
    /// Allowed distance between the weight sum and SCALE
    pub weight_tolerance: u64,
    pub swap_weights: SwapWeightMode,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            swap_fee: DEFAULT_SWAP_FEE,
            initial_mint: AMOUNT_LP_DEPLOYER,
            share_supply: DEFAULT_SHARE_SUPPLY,
            weight_tolerance: DEFAULT_WEIGHT_TOLERANCE,
            swap_weights: SwapWeightMode::Live,
        }
    }
}

impl EngineSettings {
    /// Reject settings the engine cannot operate with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.swap_fee < SCALE,
            "swap_fee {} must be below SCALE ({})",
            self.swap_fee,
            SCALE
        );
        ensure!(self.initial_mint > 0, "initial_mint must be positive");
        ensure!(
            self.initial_mint <= self.share_supply,
            "initial_mint {} exceeds share_supply {}",
            self.initial_mint,
            self.share_supply
        );
        ensure!(
            self.weight_tolerance < SCALE,
            "weight_tolerance {} must be below SCALE",
            self.weight_tolerance
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.swap_fee, 1_000);
        assert_eq!(settings.swap_weights, SwapWeightMode::Live);
    }

    #[test]
    fn test_rejects_fee_at_scale() {
        let settings = EngineSettings {
            swap_fee: SCALE,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_initial_mint_above_supply() {
        let settings = EngineSettings {
            initial_mint: 10,
            share_supply: 5,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let zero = EngineSettings {
            initial_mint: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: EngineSettings = toml::from_str(
            r#"
swap_fee = 3000
swap_weights = "static"
"#,
        )
        .unwrap();

        assert_eq!(settings.swap_fee, 3_000);
        assert_eq!(settings.swap_weights, SwapWeightMode::Static);
        assert_eq!(settings.initial_mint, AMOUNT_LP_DEPLOYER);
    }
}
