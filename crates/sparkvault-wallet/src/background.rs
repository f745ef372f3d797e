//! Runs the CPU-heavy engine paths on Tokio's blocking pool.
//!
//! Key derivation (100 000 PBKDF2 rounds, scrypt, BIP39 seed
//! stretching) takes long enough to stall an async executor, and bundle
//! files are read and written with blocking `std::fs` calls. These
//! helpers move the work to `spawn_blocking` and hand back the result.
//!
//! Dropping a returned future abandons the computation: the blocking
//! task runs to completion and its result is discarded. A bundle write
//! is atomic either way.

use std::path::PathBuf;

use sparkvault_types::{Network, Result, WalletError};
use zeroize::Zeroizing;

use crate::bundle::EncryptedBundle;
use crate::bundle_file;
use crate::engine::{WalletEngine, WalletExport};

/// Runs `f` on the blocking pool.
///
/// # Errors
///
/// - Whatever `f` returns.
/// - [`WalletError::Cancelled`] if the task panicked or the runtime
///   shut down before it finished.
pub async fn run_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| WalletError::Cancelled {
            reason: format!("blocking task did not complete: {e}"),
        })?
}

/// [`WalletEngine::generate_wallet`] off the async executor.
pub async fn generate_wallet(
    engine: &WalletEngine,
    strength_bits: usize,
    network: Network,
) -> Result<WalletExport> {
    let engine = engine.clone();
    run_blocking(move || engine.generate_wallet(strength_bits, network)).await
}

/// [`WalletEngine::import_wallet`] off the async executor.
pub async fn import_wallet(
    engine: &WalletEngine,
    mnemonic: Zeroizing<String>,
    passphrase: Zeroizing<String>,
    network: Network,
) -> Result<WalletExport> {
    let engine = engine.clone();
    run_blocking(move || engine.import_wallet(&mnemonic, &passphrase, network)).await
}

/// [`WalletEngine::encrypt_payload`] off the async executor.
pub async fn encrypt_payload(
    engine: &WalletEngine,
    payload: Zeroizing<Vec<u8>>,
    password: Zeroizing<String>,
) -> Result<EncryptedBundle> {
    let engine = engine.clone();
    run_blocking(move || engine.encrypt_payload(&payload, &password)).await
}

/// [`WalletEngine::decrypt_payload`] off the async executor.
pub async fn decrypt_payload(
    engine: &WalletEngine,
    bundle: EncryptedBundle,
    password: Zeroizing<String>,
) -> Result<Zeroizing<Vec<u8>>> {
    let engine = engine.clone();
    run_blocking(move || engine.decrypt_payload(&bundle, &password)).await
}

/// [`bundle_file::write_bundle`] off the async executor.
pub async fn write_bundle(path: PathBuf, bundle: EncryptedBundle) -> Result<()> {
    run_blocking(move || bundle_file::write_bundle(&path, &bundle)).await
}

/// [`bundle_file::read_bundle`] off the async executor.
pub async fn read_bundle(path: PathBuf) -> Result<EncryptedBundle> {
    run_blocking(move || bundle_file::read_bundle(&path)).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
