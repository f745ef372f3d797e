//! Injectable source of cryptographic randomness.
//!
//! Every operation that needs fresh randomness (mnemonic generation,
//! bundle salts and IVs) receives an [`EntropySource`] instead of
//! reaching for a global RNG. Production code uses [`OsEntropy`];
//! [`FixedEntropy`] replays a fixed byte pattern so known-answer tests
//! are reproducible.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::OsRng;
use rand::RngCore;
use sparkvault_types::{Result, WalletError};
use zeroize::Zeroizing;

/// A thread-safe CSPRNG capability.
pub trait EntropySource: Send + Sync {
    /// Fills `dest` entirely with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// OsEntropy
// ---------------------------------------------------------------------------

/// Operating-system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| WalletError::CryptoError {
                reason: format!("OS entropy source failed: {e}"),
            })
    }
}

// ---------------------------------------------------------------------------
// FixedEntropy
// ---------------------------------------------------------------------------

/// Deterministic entropy that cycles through a fixed byte pattern.
///
/// Consecutive calls continue where the previous call stopped, so two
/// draws never return the same window unless the pattern wraps.
/// **Never** use outside of tests and reproducible vector generation.
pub struct FixedEntropy {
    pattern: Zeroizing<Vec<u8>>,
    cursor: AtomicUsize,
}

impl FixedEntropy {
    /// Creates a source replaying `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::ConfigError`] if `pattern` is empty.
    pub fn new(pattern: impl Into<Vec<u8>>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(WalletError::ConfigError {
                reason: "fixed entropy pattern must not be empty".into(),
            });
        }
        Ok(Self {
            pattern: Zeroizing::new(pattern),
            cursor: AtomicUsize::new(0),
        })
    }
}

impl EntropySource for FixedEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        let start = self.cursor.fetch_add(dest.len(), Ordering::Relaxed);
        let len = self.pattern.len();
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = self.pattern[(start + i) % len];
        }
        Ok(())
    }
}
