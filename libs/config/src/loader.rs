//! Configuration Loading
//!
//! Loads [`WammConfig`] from a TOML file, an optional environment-specific
//! overlay and `WAMM_`-prefixed environment variables, in that order.

use crate::defaults::ENV_PREFIX;
use crate::engine::EngineSettings;
use crate::logging::LoggingConfig;
use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default location of the base configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/wamm.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WammConfig {
    pub logging: LoggingConfig,
    pub engine: EngineSettings,
}

impl WammConfig {
    /// Load configuration from files with environment overrides
    ///
    /// The overlay for `environment` is looked up next to the base file as
    /// `environments/<environment>.toml`; a missing overlay only logs a warning.
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

        let mut builder = Config::builder().add_source(File::from(base).required(true));

        if let Some(env) = environment {
            let env_file = environment_overlay_path(base, env);

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // WAMM_ENGINE__SWAP_FEE=3000 overrides engine.swap_fee
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config
            .engine
            .validate()
            .context("Invalid engine settings")?;

        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Parse configuration from an in-memory TOML document, without overlays
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse TOML configuration")?;
        config
            .engine
            .validate()
            .context("Invalid engine settings")?;
        Ok(config)
    }
}

/// Convenience function to load configuration from the default path
pub fn load_config(environment: Option<&str>) -> Result<WammConfig> {
    WammConfig::load(None, environment)
}

/// Resolve the overlay path for an environment relative to a base file
pub fn environment_overlay_path(base: &Path, environment: &str) -> PathBuf {
    base.parent()
        .unwrap_or(Path::new("."))
        .join("environments")
        .join(format!("{}.toml", environment))
}
