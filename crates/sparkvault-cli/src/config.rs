//! Engine configuration loading for the CLI.
//!
//! The configuration file is the JSON form of [`EngineConfig`]; every
//! field is optional and falls back to its default. Flags override
//! single fields after the file is read.

use std::path::Path;

use sparkvault_types::config::EngineConfig;
use sparkvault_types::Network;

/// Loads and validates the engine configuration.
pub fn load(
    path: Option<&Path>,
    network: Option<Network>,
) -> std::result::Result<EngineConfig, String> {
    let mut config = match path {
        Some(path) => read(path)?,
        None => EngineConfig::default(),
    };

    if let Some(network) = network {
        config.network = network;
    }

    config.validate().map_err(|e| e.to_string())?;
    tracing::debug!(network = %config.network, "configuration loaded");
    Ok(config)
}

fn read(path: &Path) -> std::result::Result<EngineConfig, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read config file {}: {e}", path.display()))?;
    serde_json::from_str(&json)
        .map_err(|e| format!("failed to parse config file {}: {e}", path.display()))
}
