//! Engine configuration with sensible defaults.
//!
//! All tunable parameters of the key engine are centralized here. The
//! CLI loads an [`EngineConfig`] from a JSON file and overrides single
//! fields from flags; library callers build one in code.

use serde::{Deserialize, Serialize};

use crate::{Network, Result, WalletError};

/// Minimum PBKDF2 iteration count accepted for new bundles.
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

/// Upper bound on PBKDF2 iterations accepted anywhere.
pub const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

/// Minimum scrypt cost, as log2(N), accepted for new bundles.
pub const MIN_SCRYPT_LOG_N: u8 = 14;

/// Maximum scrypt cost, as log2(N).
pub const MAX_SCRYPT_LOG_N: u8 = 20;

/// Maximum scrypt parallelism.
pub const MAX_SCRYPT_P: u32 = 16;

/// Upper bound on scrypt memory (`128 · r · N` bytes).
pub const MAX_SCRYPT_MEMORY: u64 = 1 << 30;

/// Hard floor for the configurable password minimum length.
pub const PASSWORD_MIN_LENGTH_FLOOR: usize = 8;

/// Mnemonic strengths accepted by generation, in bits.
pub const VALID_STRENGTHS: [usize; 5] = [128, 160, 192, 224, 256];

/// Key derivation function used to seal new bundles.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KdfMethod {
    /// PBKDF2-HMAC-SHA512.
    #[default]
    Pbkdf2,
    /// scrypt (memory-hard).
    Scrypt,
}

/// Global engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Network used when a caller does not name one.
    pub network: Network,

    /// Entropy strength for generated mnemonics, in bits.
    pub strength_bits: usize,

    // ----- Encryption ------------------------------------------------------

    /// KDF used for newly created bundles. Decryption always follows
    /// whatever the bundle records.
    pub kdf: KdfMethod,

    /// PBKDF2 iteration count. Must be at least
    /// [`MIN_PBKDF2_ITERATIONS`].
    pub pbkdf2_iterations: u32,

    /// scrypt cost parameter as log2(N). Default 14 (N = 16384).
    pub scrypt_log_n: u8,

    /// scrypt block size.
    pub scrypt_r: u32,

    /// scrypt parallelism.
    pub scrypt_p: u32,

    /// Minimum password length enforced before encryption.
    pub password_min_length: usize,

    // ----- Export ----------------------------------------------------------

    /// Number of receive addresses exported per scheme by
    /// generate/import.
    pub addresses_per_scheme: u32,

    // ----- Spark layer-2 scheme --------------------------------------------

    /// Human-readable part of Spark addresses.
    pub spark_hrp: String,

    /// Scheme version encoded as the first data symbol.
    pub spark_version: u8,

    /// BIP43 purpose used to derive Spark identity keys.
    pub spark_purpose: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            strength_bits: 128,
            kdf: KdfMethod::Pbkdf2,
            pbkdf2_iterations: MIN_PBKDF2_ITERATIONS,
            scrypt_log_n: 14,
            scrypt_r: 8,
            scrypt_p: 1,
            password_min_length: 12,
            addresses_per_scheme: 1,
            spark_hrp: "sp".into(),
            spark_version: 0,
            spark_purpose: 8_797_555,
        }
    }
}

impl EngineConfig {
    /// Validates all configuration values.
    ///
    /// Returns an error if any value is outside its acceptable range.
    pub fn validate(&self) -> Result<()> {
        if !VALID_STRENGTHS.contains(&self.strength_bits) {
            return Err(WalletError::ConfigError {
                reason: format!(
                    "strength_bits must be one of {VALID_STRENGTHS:?}, got {}",
                    self.strength_bits
                ),
            });
        }

        if !(MIN_PBKDF2_ITERATIONS..=MAX_PBKDF2_ITERATIONS).contains(&self.pbkdf2_iterations) {
            return Err(WalletError::ConfigError {
                reason: format!(
                    "pbkdf2_iterations must be {MIN_PBKDF2_ITERATIONS}..={MAX_PBKDF2_ITERATIONS}"
                ),
            });
        }

        if !(MIN_SCRYPT_LOG_N..=MAX_SCRYPT_LOG_N).contains(&self.scrypt_log_n) {
            return Err(WalletError::ConfigError {
                reason: format!("scrypt_log_n must be {MIN_SCRYPT_LOG_N}..={MAX_SCRYPT_LOG_N}"),
            });
        }

        if self.scrypt_r == 0 || !(1..=MAX_SCRYPT_P).contains(&self.scrypt_p) {
            return Err(WalletError::ConfigError {
                reason: format!("scrypt_r must be positive and scrypt_p 1..={MAX_SCRYPT_P}"),
            });
        }

        let scrypt_memory = 128u64 * u64::from(self.scrypt_r) * (1u64 << self.scrypt_log_n);
        if scrypt_memory > MAX_SCRYPT_MEMORY {
            return Err(WalletError::ConfigError {
                reason: format!(
                    "scrypt would need {scrypt_memory} bytes of memory, limit is {MAX_SCRYPT_MEMORY}"
                ),
            });
        }

        if self.password_min_length < PASSWORD_MIN_LENGTH_FLOOR {
            return Err(WalletError::ConfigError {
                reason: format!(
                    "password_min_length must be at least {PASSWORD_MIN_LENGTH_FLOOR}"
                ),
            });
        }

        if self.addresses_per_scheme == 0 || self.addresses_per_scheme > 1000 {
            return Err(WalletError::ConfigError {
                reason: "addresses_per_scheme must be 1..=1000".into(),
            });
        }

        validate_hrp(&self.spark_hrp)?;

        if self.spark_version > 31 {
            return Err(WalletError::ConfigError {
                reason: "spark_version must fit in one bech32 symbol (0..=31)".into(),
            });
        }

        if self.spark_purpose >= 0x8000_0000 {
            return Err(WalletError::ConfigError {
                reason: "spark_purpose must be below 2^31".into(),
            });
        }

        Ok(())
    }
}

fn validate_hrp(hrp: &str) -> Result<()> {
    if hrp.is_empty() || hrp.len() > 83 {
        return Err(WalletError::ConfigError {
            reason: "spark_hrp must be 1..=83 characters".into(),
        });
    }
    if hrp.bytes().any(|b| !(33..=126).contains(&b) || b.is_ascii_uppercase()) {
        return Err(WalletError::ConfigError {
            reason: "spark_hrp must be lowercase printable ASCII".into(),
        });
    }
    if hrp == "bc" || hrp == "tb" {
        return Err(WalletError::ConfigError {
            reason: "spark_hrp must not collide with a segwit HRP".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.strength_bits, 128);
        assert_eq!(config.kdf, KdfMethod::Pbkdf2);
        assert_eq!(config.pbkdf2_iterations, 100_000);
        assert_eq!(config.scrypt_log_n, 14);
        assert_eq!(config.scrypt_r, 8);
        assert_eq!(config.scrypt_p, 1);
        assert_eq!(config.password_min_length, 12);
        assert_eq!(config.spark_hrp, "sp");
        assert_eq!(config.spark_version, 0);
    }

    #[test]
    fn odd_strength_rejected() {
        let config = EngineConfig {
            strength_bits: 100,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn low_iterations_rejected() {
        let config = EngineConfig {
            pbkdf2_iterations: 99_999,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn scrypt_cost_below_encrypt_floor_rejected() {
        let config = EngineConfig {
            kdf: KdfMethod::Scrypt,
            scrypt_log_n: MIN_SCRYPT_LOG_N - 1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn scrypt_memory_ceiling_enforced() {
        // 128 * 64 * 2^20 bytes = 8 GiB
        let config = EngineConfig {
            scrypt_log_n: MAX_SCRYPT_LOG_N,
            scrypt_r: 64,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            scrypt_log_n: MAX_SCRYPT_LOG_N,
            scrypt_r: 8,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn iteration_ceiling_enforced() {
        let config = EngineConfig {
            pbkdf2_iterations: MAX_PBKDF2_ITERATIONS + 1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn password_floor_enforced() {
        let config = EngineConfig {
            password_min_length: 7,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            password_min_length: 8,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn spark_hrp_checks() {
        for bad in ["", "SP", "bc", "s p"] {
            let config = EngineConfig {
                spark_hrp: bad.into(),
                ..EngineConfig::default()
            };
            assert!(config.validate().is_err(), "hrp {bad:?} accepted");
        }
    }

    #[test]
    fn spark_version_must_fit_symbol() {
        let config = EngineConfig {
            spark_version: 32,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() -> std::result::Result<(), serde_json::Error> {
        let config: EngineConfig =
            serde_json::from_str(r#"{"network":"testnet","kdf":"scrypt"}"#)?;
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.kdf, KdfMethod::Scrypt);
        assert_eq!(config.strength_bits, 128);
        assert!(config.validate().is_ok());
        Ok(())
    }
}
