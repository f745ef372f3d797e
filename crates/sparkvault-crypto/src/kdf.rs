//! Password-based key derivation for bundle encryption.
//!
//! Derives a 256-bit AES key from a user password and a random salt with
//! either PBKDF2-HMAC-SHA512 or scrypt. New bundles must meet the
//! minimum costs in [`KdfParams::check_encrypt_strength`]; bundles read
//! back are additionally capped by [`KdfParams::check_decrypt_bounds`]
//! so a crafted file cannot demand unbounded CPU or memory.

use hmac::Hmac;
use sha2::Sha512;
use sparkvault_types::config::{
    EngineConfig, KdfMethod, MAX_SCRYPT_LOG_N, MAX_SCRYPT_P, MIN_PBKDF2_ITERATIONS,
    MIN_SCRYPT_LOG_N,
};
use sparkvault_types::{Result, WalletError};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum accepted salt length in bytes.
pub const MIN_SALT_LEN: usize = 16;

/// Salt length used for new bundles.
pub const SALT_LEN: usize = 32;

pub use sparkvault_types::config::{MAX_PBKDF2_ITERATIONS, MAX_SCRYPT_MEMORY};

// ---------------------------------------------------------------------------
// KdfParams
// ---------------------------------------------------------------------------

/// KDF selection and cost parameters.
///
/// # Defaults
///
/// | Method  | Parameters                   |
/// |---------|------------------------------|
/// | PBKDF2  | 100 000 iterations, SHA-512  |
/// | scrypt  | N = 2^14, r = 8, p = 1       |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KdfParams {
    /// PBKDF2-HMAC-SHA512.
    Pbkdf2 {
        /// Iteration count.
        iterations: u32,
    },
    /// scrypt.
    Scrypt {
        /// log2 of the CPU/memory cost `N`.
        log_n: u8,
        /// Block size.
        r: u32,
        /// Parallelism.
        p: u32,
    },
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::pbkdf2_default()
    }
}

impl KdfParams {
    /// PBKDF2 with the minimum iteration count.
    pub fn pbkdf2_default() -> Self {
        Self::Pbkdf2 {
            iterations: MIN_PBKDF2_ITERATIONS,
        }
    }

    /// scrypt with N = 16384, r = 8, p = 1.
    pub fn scrypt_default() -> Self {
        Self::Scrypt {
            log_n: 14,
            r: 8,
            p: 1,
        }
    }

    /// Picks the method and costs named by an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        match config.kdf {
            KdfMethod::Pbkdf2 => Self::Pbkdf2 {
                iterations: config.pbkdf2_iterations,
            },
            KdfMethod::Scrypt => Self::Scrypt {
                log_n: config.scrypt_log_n,
                r: config.scrypt_r,
                p: config.scrypt_p,
            },
        }
    }

    /// Wire name of the method, as recorded in bundles.
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::Pbkdf2 { .. } => "pbkdf2-sha512",
            Self::Scrypt { .. } => "scrypt",
        }
    }

    /// Rejects parameters too weak for sealing new data.
    pub fn check_encrypt_strength(&self) -> Result<()> {
        match *self {
            Self::Pbkdf2 { iterations } if iterations < MIN_PBKDF2_ITERATIONS => {
                Err(WalletError::ConfigError {
                    reason: format!(
                        "PBKDF2 requires at least {MIN_PBKDF2_ITERATIONS} iterations, got {iterations}"
                    ),
                })
            }
            Self::Scrypt { log_n, .. } if log_n < MIN_SCRYPT_LOG_N => {
                Err(WalletError::ConfigError {
                    reason: format!("scrypt requires N >= 2^{MIN_SCRYPT_LOG_N}, got 2^{log_n}"),
                })
            }
            _ => self.check_decrypt_bounds(),
        }
    }

    /// Rejects parameters outside what this build is willing to compute.
    pub fn check_decrypt_bounds(&self) -> Result<()> {
        match *self {
            Self::Pbkdf2 { iterations } => {
                if iterations == 0 || iterations > MAX_PBKDF2_ITERATIONS {
                    return Err(WalletError::ConfigError {
                        reason: format!("PBKDF2 iterations {iterations} out of bounds"),
                    });
                }
            }
            Self::Scrypt { log_n, r, p } => {
                if log_n == 0 || log_n > MAX_SCRYPT_LOG_N || r == 0 || p == 0 || p > MAX_SCRYPT_P {
                    return Err(WalletError::ConfigError {
                        reason: format!("scrypt parameters N=2^{log_n} r={r} p={p} out of bounds"),
                    });
                }
                let memory = 128u64 * u64::from(r) * (1u64 << log_n);
                if memory > MAX_SCRYPT_MEMORY {
                    return Err(WalletError::ConfigError {
                        reason: format!("scrypt would need {memory} bytes of memory"),
                    });
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DerivedKey
// ---------------------------------------------------------------------------

/// 256-bit key derived from a password.
///
/// Automatically zeroized when dropped to minimize the time
/// sensitive material resides in memory.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; 32]);

impl DerivedKey {
    /// Fixed byte length of the derived key.
    pub const LEN: usize = 32;

    /// Returns the raw 32-byte key material.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// DerivedKey does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

/// Derives a 256-bit key from a password and salt.
///
/// # Errors
///
/// - [`WalletError::ConfigError`] if the salt is shorter than
///   [`MIN_SALT_LEN`] or the parameters are out of bounds.
/// - [`WalletError::CryptoError`] if the underlying KDF fails.
pub fn derive_key(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    if salt.len() < MIN_SALT_LEN {
        return Err(WalletError::ConfigError {
            reason: format!(
                "salt must be at least {MIN_SALT_LEN} bytes, got {}",
                salt.len()
            ),
        });
    }
    params.check_decrypt_bounds()?;

    let mut output = [0u8; DerivedKey::LEN];
    match *params {
        KdfParams::Pbkdf2 { iterations } => {
            pbkdf2::pbkdf2::<Hmac<Sha512>>(password, salt, iterations, &mut output).map_err(
                |e| WalletError::CryptoError {
                    reason: format!("PBKDF2-HMAC-SHA512 failed: {e}"),
                },
            )?;
        }
        KdfParams::Scrypt { log_n, r, p } => {
            let scrypt_params = scrypt::Params::new(log_n, r, p, DerivedKey::LEN).map_err(|e| {
                WalletError::ConfigError {
                    reason: format!("invalid scrypt parameters: {e}"),
                }
            })?;
            scrypt::scrypt(password, salt, &scrypt_params, &mut output).map_err(|e| {
                WalletError::CryptoError {
                    reason: format!("scrypt derivation failed: {e}"),
                }
            })?;
        }
    }

    tracing::trace!(method = params.method_name(), "key derived");
    Ok(DerivedKey(output))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: &[u8] = b"0123456789abcdef";

    /// Light parameters suitable for fast unit tests.
    fn light_pbkdf2() -> KdfParams {
        KdfParams::Pbkdf2 { iterations: 1_000 }
    }

    fn light_scrypt() -> KdfParams {
        KdfParams::Scrypt {
            log_n: 10,
            r: 8,
            p: 1,
        }
    }

    #[test]
    fn pbkdf2_is_deterministic() -> std::result::Result<(), WalletError> {
        let a = derive_key(b"correct horse battery staple", SALT, &light_pbkdf2())?;
        let b = derive_key(b"correct horse battery staple", SALT, &light_pbkdf2())?;
        assert_eq!(a.as_bytes(), b.as_bytes());
        Ok(())
    }

    #[test]
    fn scrypt_is_deterministic() -> std::result::Result<(), WalletError> {
        let a = derive_key(b"pw", SALT, &light_scrypt())?;
        let b = derive_key(b"pw", SALT, &light_scrypt())?;
        assert_eq!(a.as_bytes(), b.as_bytes());
        Ok(())
    }

    #[test]
    fn methods_produce_different_keys() -> std::result::Result<(), WalletError> {
        let a = derive_key(b"pw", SALT, &light_pbkdf2())?;
        let b = derive_key(b"pw", SALT, &light_scrypt())?;
        assert_ne!(a.as_bytes(), b.as_bytes());
        Ok(())
    }

    #[test]
    fn different_salt_different_key() -> std::result::Result<(), WalletError> {
        let a = derive_key(b"pw", b"salt_aaaaaaa_aaa", &light_pbkdf2())?;
        let b = derive_key(b"pw", b"salt_bbbbbbb_bbb", &light_pbkdf2())?;
        assert_ne!(a.as_bytes(), b.as_bytes());
        Ok(())
    }

    #[test]
    fn salt_too_short_rejected() {
        assert!(derive_key(b"pw", b"short", &light_pbkdf2()).is_err());
    }

    #[test]
    fn encrypt_strength_floor() {
        assert!(light_pbkdf2().check_encrypt_strength().is_err());
        assert!(light_scrypt().check_encrypt_strength().is_err());
        assert!(KdfParams::pbkdf2_default().check_encrypt_strength().is_ok());
        assert!(KdfParams::scrypt_default().check_encrypt_strength().is_ok());
    }

    #[test]
    fn decrypt_bounds_refuse_absurd_costs() {
        let too_many = KdfParams::Pbkdf2 {
            iterations: MAX_PBKDF2_ITERATIONS + 1,
        };
        assert!(too_many.check_decrypt_bounds().is_err());

        let too_much_memory = KdfParams::Scrypt {
            log_n: 20,
            r: 16,
            p: 1,
        };
        assert!(too_much_memory.check_decrypt_bounds().is_err());

        let zero = KdfParams::Pbkdf2 { iterations: 0 };
        assert!(derive_key(b"pw", SALT, &zero).is_err());
    }

    #[test]
    fn from_config_follows_method() {
        let config = EngineConfig {
            kdf: KdfMethod::Scrypt,
            ..EngineConfig::default()
        };
        assert_eq!(KdfParams::from_config(&config), KdfParams::scrypt_default());
        assert_eq!(
            KdfParams::from_config(&EngineConfig::default()),
            KdfParams::pbkdf2_default()
        );
    }

    /// RFC 7914 §12 scrypt vector: P="password", S="NaCl", N=1024, r=8, p=16.
    #[test]
    fn scrypt_rfc7914_prefix() -> std::result::Result<(), WalletError> {
        let params = scrypt::Params::new(10, 8, 16, 64).map_err(|e| WalletError::ConfigError {
            reason: e.to_string(),
        })?;
        let mut out = [0u8; 64];
        scrypt::scrypt(b"password", b"NaCl", &params, &mut out).map_err(|e| {
            WalletError::CryptoError {
                reason: e.to_string(),
            }
        })?;
        assert_eq!(&out[..8], &[0xfd, 0xba, 0xbe, 0x1c, 0x9d, 0x34, 0x72, 0x00]);
        Ok(())
    }
}
