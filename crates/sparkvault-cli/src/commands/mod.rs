//! Command handlers, one module per command family.
//!
//! Handlers return `Err(String)` with a message ready for
//! [`crate::output::print_error`].

pub mod bundle;
pub mod codec;
pub mod wallet;

use sparkvault_types::config::EngineConfig;
use sparkvault_wallet::engine::WalletEngine;

/// Builds an engine backed by the operating-system CSPRNG.
pub fn engine(config: &EngineConfig) -> std::result::Result<WalletEngine, String> {
    WalletEngine::with_os_entropy(config.clone()).map_err(|e| e.to_string())
}
