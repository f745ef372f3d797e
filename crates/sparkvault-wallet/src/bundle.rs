//! Versioned JSON wire format for encrypted payloads.
//!
//! # Layout (version 1)
//!
//! ```json
//! {
//!   "version": 1,
//!   "algorithm": "aes-256-gcm",
//!   "keyDerivation": {
//!     "method": "pbkdf2-sha512",
//!     "salt": "<hex 32 bytes>",
//!     "iterations": 100000
//!   },
//!   "encryption": {
//!     "iv": "<hex 16 bytes>",
//!     "authTag": "<hex 16 bytes>",
//!     "data": "<hex ciphertext>",
//!     "aad": "<hex canonical AAD JSON>"
//!   },
//!   "metadata": {
//!     "timestamp": 1700000000000,
//!     "checksum": "<hex SHA-256 of ciphertext>"
//!   }
//! }
//! ```
//!
//! scrypt bundles replace `iterations` with
//! `"scryptParams": {"N": 16384, "r": 8, "p": 1}`.
//!
//! The structs here only describe the wire shape. [`EncryptedBundle::parts`]
//! turns the hex strings into validated bytes before any key is derived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sparkvault_crypto::aead::{Iv, IV_LEN, TAG_LEN};
use sparkvault_crypto::kdf::{KdfParams, MIN_SALT_LEN};
use sparkvault_types::{Result, WalletError};

/// Current bundle format version.
pub const BUNDLE_VERSION: u32 = 1;

/// Cipher identifier recorded in every bundle.
pub const ALGORITHM: &str = "aes-256-gcm";

/// Length of the SHA-256 ciphertext checksum.
pub const CHECKSUM_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// An encrypted payload with everything needed to decrypt it except
/// the password.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedBundle {
    /// Format version.
    pub version: u32,
    /// Cipher identifier, always [`ALGORITHM`] for version 1.
    pub algorithm: String,
    /// Password KDF method, salt and costs.
    pub key_derivation: KeyDerivation,
    /// IV, tag, ciphertext and AAD.
    pub encryption: EncryptionFields,
    /// Creation time and ciphertext checksum.
    pub metadata: BundleMetadata,
}

/// `keyDerivation` section.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDerivation {
    /// `"pbkdf2-sha512"` or `"scrypt"`.
    pub method: String,
    /// Hex-encoded salt.
    pub salt: String,
    /// PBKDF2 iteration count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    /// scrypt costs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrypt_params: Option<ScryptParams>,
}

/// `keyDerivation.scryptParams` section.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScryptParams {
    /// CPU/memory cost, a power of two.
    #[serde(rename = "N")]
    pub n: u64,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
}

/// `encryption` section.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionFields {
    /// Hex-encoded 16-byte IV.
    pub iv: String,
    /// Hex-encoded 16-byte GCM tag.
    pub auth_tag: String,
    /// Hex-encoded ciphertext.
    pub data: String,
    /// Hex-encoded additional authenticated data.
    pub aad: String,
}

/// `metadata` section.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Hex-encoded SHA-256 of the ciphertext.
    pub checksum: String,
}

/// Header authenticated alongside the ciphertext.
///
/// Field order is part of the format: serializing this struct yields
/// `{"version":1,"timestamp":<ms>,"algorithm":"aes-256-gcm"}`.
#[derive(Serialize)]
struct AadHeader<'a> {
    version: u32,
    timestamp: i64,
    algorithm: &'a str,
}

/// Canonical AAD bytes for a bundle header.
pub fn canonical_aad(version: u32, timestamp: i64, algorithm: &str) -> Result<Vec<u8>> {
    serde_json::to_vec(&AadHeader {
        version,
        timestamp,
        algorithm,
    })
    .map_err(|e| WalletError::SerializationError {
        reason: format!("failed to encode bundle AAD: {e}"),
    })
}

impl KeyDerivation {
    /// Records `params` and `salt` in wire form.
    pub fn new(params: &KdfParams, salt: &[u8]) -> Self {
        let (iterations, scrypt_params) = match *params {
            KdfParams::Pbkdf2 { iterations } => (Some(iterations), None),
            KdfParams::Scrypt { log_n, r, p } => (
                None,
                Some(ScryptParams {
                    n: 1u64 << log_n,
                    r,
                    p,
                }),
            ),
        };
        Self {
            method: params.method_name().to_owned(),
            salt: hex::encode(salt),
            iterations,
            scrypt_params,
        }
    }

    /// Reads the KDF method and costs back.
    ///
    /// # Errors
    ///
    /// - [`WalletError::SerializationError`] for an unknown method, a
    ///   missing or conflicting cost field, or an `N` that is not a
    ///   power of two.
    /// - [`WalletError::ConfigError`] if the costs are out of bounds.
    pub fn params(&self) -> Result<KdfParams> {
        let params = match (
            self.method.as_str(),
            self.iterations,
            self.scrypt_params,
        ) {
            ("pbkdf2-sha512", Some(iterations), None) => KdfParams::Pbkdf2 { iterations },
            ("scrypt", None, Some(sp)) => {
                if sp.n < 2 || !sp.n.is_power_of_two() {
                    return Err(schema(format!("scrypt N={} is not a power of two", sp.n)));
                }
                KdfParams::Scrypt {
                    log_n: sp.n.trailing_zeros() as u8,
                    r: sp.r,
                    p: sp.p,
                }
            }
            (method @ ("pbkdf2-sha512" | "scrypt"), _, _) => {
                return Err(schema(format!("key derivation fields do not match method {method}")))
            }
            (method, _, _) => {
                return Err(schema(format!("unsupported key derivation method {method:?}")))
            }
        };
        params.check_decrypt_bounds()?;
        Ok(params)
    }
}

// ---------------------------------------------------------------------------
// Decoded view
// ---------------------------------------------------------------------------

/// Byte-level view of a schema-valid bundle.
pub(crate) struct BundleParts {
    pub(crate) kdf: KdfParams,
    pub(crate) salt: Vec<u8>,
    pub(crate) iv: Iv,
    pub(crate) tag: [u8; TAG_LEN],
    pub(crate) ciphertext: Vec<u8>,
    pub(crate) aad: Vec<u8>,
    pub(crate) checksum: [u8; CHECKSUM_LEN],
}

/// Password-free summary of a bundle, as reported by
/// [`crate::vault::EncryptionVault::inspect`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BundleInfo {
    /// Format version.
    pub version: u32,
    /// KDF method and costs.
    pub kdf: KdfParams,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Ciphertext length, equal to the plaintext length.
    pub payload_len: usize,
}

impl EncryptedBundle {
    /// Serializes the bundle as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| WalletError::SerializationError {
            reason: format!("failed to encode bundle: {e}"),
        })
    }

    /// Parses a bundle from JSON without validating its contents.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| WalletError::SerializationError {
            reason: format!("failed to parse bundle: {e}"),
        })
    }

    /// Creation time as a UTC datetime.
    pub fn created_at(&self) -> Result<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.metadata.timestamp).ok_or_else(|| {
            schema(format!(
                "timestamp {} is out of range",
                self.metadata.timestamp
            ))
        })
    }

    /// Validates the schema and decodes every binary field.
    ///
    /// # Validation order
    ///
    /// 1. Version equals [`BUNDLE_VERSION`].
    /// 2. Algorithm equals [`ALGORITHM`].
    /// 3. KDF method, costs and salt length.
    /// 4. IV, tag, ciphertext, AAD and checksum hex and lengths.
    pub(crate) fn parts(&self) -> Result<BundleParts> {
        if self.version != BUNDLE_VERSION {
            return Err(WalletError::UnsupportedBundleVersion {
                version: self.version,
            });
        }
        if self.algorithm != ALGORITHM {
            return Err(schema(format!(
                "unsupported algorithm {:?}",
                self.algorithm
            )));
        }

        let kdf = self.key_derivation.params()?;
        let salt = decode_hex(&self.key_derivation.salt, "salt")?;
        if salt.len() < MIN_SALT_LEN {
            return Err(schema(format!(
                "salt must be at least {MIN_SALT_LEN} bytes, got {}",
                salt.len()
            )));
        }

        let enc = &self.encryption;
        let iv = Iv::from_bytes(decode_fixed::<IV_LEN>(&enc.iv, "iv")?);
        let tag = decode_fixed::<TAG_LEN>(&enc.auth_tag, "authTag")?;
        let ciphertext = decode_hex(&enc.data, "data")?;
        let aad = decode_hex(&enc.aad, "aad")?;
        let checksum = decode_fixed::<CHECKSUM_LEN>(&self.metadata.checksum, "checksum")?;

        Ok(BundleParts {
            kdf,
            salt,
            iv,
            tag,
            ciphertext,
            aad,
            checksum,
        })
    }
}

fn schema(reason: String) -> WalletError {
    WalletError::SerializationError { reason }
}

fn decode_hex(value: &str, field: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| schema(format!("invalid {field} hex: {e}")))
}

fn decode_fixed<const N: usize>(value: &str, field: &str) -> Result<[u8; N]> {
    let bytes = decode_hex(value, field)?;
    if bytes.len() != N {
        return Err(schema(format!(
            "{field} must be {N} bytes, got {}",
            bytes.len()
        )));
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
