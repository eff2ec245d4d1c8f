//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;
pub mod input;
pub mod ledger;
pub mod process;

use std::path::{Path, PathBuf};

use stockscan_core::StockscanConfig;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockscan")
        .join("config.json")
}

/// Load configuration from `-c`, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StockscanConfig> {
    if let Some(path) = config_path {
        return Ok(StockscanConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(StockscanConfig::from_file(&default_path)?)
    } else {
        Ok(StockscanConfig::default())
    }
}
