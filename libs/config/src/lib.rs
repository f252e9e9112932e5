//! # Weighted AMM Configuration
//!
//! Centralized configuration, defaults and logging setup for the pool engine.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wamm_config::{init_tracing, WammConfig};
//! use std::path::Path;
//!
//! let config = WammConfig::load(Some(Path::new("config/wamm.toml")), Some("staging"))?;
//! init_tracing(&config.logging);
//! println!("swap fee: {}", config.engine.swap_fee);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod defaults;
pub mod engine;
pub mod loader;
pub mod logging;

pub use defaults::*;
pub use engine::{EngineSettings, SwapWeightMode};
pub use loader::{load_config, WammConfig};
pub use logging::{init_tracing, LoggingConfig};
