//! Password-based encryption of arbitrary payloads.
//!
//! [`EncryptionVault::encrypt`] seals bytes into an [`EncryptedBundle`]:
//!
//! 1. Check the password against the [`PasswordPolicy`].
//! 2. Draw a 32-byte salt and a 16-byte IV from the injected entropy.
//! 3. Derive a 256-bit key with PBKDF2-HMAC-SHA512 or scrypt.
//! 4. Encrypt with AES-256-GCM, authenticating the canonical header
//!    `{"version":1,"timestamp":<ms>,"algorithm":"aes-256-gcm"}`.
//! 5. Record the SHA-256 of the ciphertext as a checksum.
//!
//! [`EncryptionVault::decrypt`] reverses this and collapses **every**
//! failure (bad schema, unknown version, checksum mismatch, wrong
//! password, tampered data) into [`WalletError::DecryptionFailure`], so
//! the caller cannot tell a wrong password from a damaged bundle.

use std::sync::Arc;

use sparkvault_crypto::aead::{self, Iv};
use sparkvault_crypto::ct::constant_time_eq;
use sparkvault_crypto::entropy::{EntropySource, OsEntropy};
use sparkvault_crypto::hash::sha256;
use sparkvault_crypto::kdf::{derive_key, KdfParams, SALT_LEN};
use sparkvault_types::config::EngineConfig;
use sparkvault_types::{Result, WalletError};
use zeroize::Zeroizing;

use crate::bundle::{
    canonical_aad, BundleInfo, BundleMetadata, EncryptedBundle, EncryptionFields, KeyDerivation,
    ALGORITHM, BUNDLE_VERSION,
};
use crate::password::PasswordPolicy;

/// Per-call overrides for [`EncryptionVault::encrypt`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EncryptOptions {
    /// KDF to use instead of the vault default.
    pub kdf: Option<KdfParams>,
    /// Creation time in milliseconds instead of the current time.
    pub timestamp_ms: Option<i64>,
}

impl EncryptOptions {
    /// Options selecting a specific KDF.
    pub fn with_kdf(kdf: KdfParams) -> Self {
        Self {
            kdf: Some(kdf),
            ..Self::default()
        }
    }
}

/// Seals and opens [`EncryptedBundle`]s.
///
/// Cheap to clone; clones share the entropy source.
#[derive(Clone)]
pub struct EncryptionVault {
    rng: Arc<dyn EntropySource>,
    policy: PasswordPolicy,
    default_kdf: KdfParams,
}

impl EncryptionVault {
    /// Creates a vault with the default policy and PBKDF2 settings.
    pub fn new(rng: Arc<dyn EntropySource>) -> Self {
        Self {
            rng,
            policy: PasswordPolicy::default(),
            default_kdf: KdfParams::default(),
        }
    }

    /// Creates a vault backed by the operating-system CSPRNG.
    pub fn with_os_entropy() -> Self {
        Self::new(Arc::new(OsEntropy))
    }

    /// Creates a vault with the policy and KDF named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::ConfigError`] if the configuration is
    /// invalid or its KDF is too weak for new bundles.
    pub fn from_config(config: &EngineConfig, rng: Arc<dyn EntropySource>) -> Result<Self> {
        config.validate()?;
        let default_kdf = KdfParams::from_config(config);
        default_kdf.check_encrypt_strength()?;
        Ok(Self {
            rng,
            policy: PasswordPolicy::new(config.password_min_length)?,
            default_kdf,
        })
    }

    /// Replaces the password policy.
    pub fn with_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active password policy.
    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// KDF used when [`EncryptOptions::kdf`] is unset.
    pub fn default_kdf(&self) -> KdfParams {
        self.default_kdf
    }

    /// Encrypts `plaintext` under `password`.
    ///
    /// # Errors
    ///
    /// - [`WalletError::WeakPasswordError`] if the password fails the policy.
    /// - [`WalletError::ConfigError`] if the chosen KDF is too weak.
    /// - [`WalletError::CryptoError`] if entropy or the cipher fails.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        password: &str,
        options: &EncryptOptions,
    ) -> Result<EncryptedBundle> {
        self.policy.check(password)?;

        let kdf = options.kdf.unwrap_or(self.default_kdf);
        kdf.check_encrypt_strength()?;

        let timestamp = options
            .timestamp_ms
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

        let mut salt = [0u8; SALT_LEN];
        self.rng.fill_bytes(&mut salt)?;
        let iv = Iv::generate(self.rng.as_ref())?;

        let key = derive_key(password.as_bytes(), &salt, &kdf)?;
        let aad = canonical_aad(BUNDLE_VERSION, timestamp, ALGORITHM)?;
        let sealed = aead::encrypt(key.as_bytes(), &iv, plaintext, &aad)?;
        let checksum = sha256(&sealed.ciphertext);

        tracing::debug!(
            method = kdf.method_name(),
            payload_len = plaintext.len(),
            "payload sealed"
        );

        Ok(EncryptedBundle {
            version: BUNDLE_VERSION,
            algorithm: ALGORITHM.to_owned(),
            key_derivation: KeyDerivation::new(&kdf, &salt),
            encryption: EncryptionFields {
                iv: hex::encode(iv.as_bytes()),
                auth_tag: hex::encode(sealed.tag),
                data: hex::encode(&sealed.ciphertext),
                aad: hex::encode(&aad),
            },
            metadata: BundleMetadata {
                timestamp,
                checksum: hex::encode(checksum),
            },
        })
    }

    /// Decrypts `bundle` with `password`.
    ///
    /// # Errors
    ///
    /// Always [`WalletError::DecryptionFailure`], whatever the cause.
    pub fn decrypt(&self, bundle: &EncryptedBundle, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        open(bundle, password).map_err(|e| {
            tracing::debug!(kind = failure_kind(&e), "bundle rejected");
            WalletError::DecryptionFailure
        })
    }

    /// Validates a bundle's schema without a password.
    ///
    /// Unlike [`decrypt`](Self::decrypt), this reports *why* a bundle is
    /// unreadable, for migration tooling.
    ///
    /// # Errors
    ///
    /// - [`WalletError::UnsupportedBundleVersion`] for an unknown version.
    /// - [`WalletError::SerializationError`] for a malformed field.
    /// - [`WalletError::ConfigError`] for out-of-bounds KDF costs.
    pub fn inspect(&self, bundle: &EncryptedBundle) -> Result<BundleInfo> {
        let parts = bundle.parts()?;
        Ok(BundleInfo {
            version: bundle.version,
            kdf: parts.kdf,
            created_at: bundle.created_at()?,
            payload_len: parts.ciphertext.len(),
        })
    }

    /// Re-encrypts a bundle under a new password.
    ///
    /// Produces a fresh bundle with a new salt, IV and timestamp; the
    /// input is left untouched. Without an explicit KDF in `options`,
    /// the old bundle's KDF is kept when it is still strong enough for
    /// new bundles.
    ///
    /// # Errors
    ///
    /// - [`WalletError::DecryptionFailure`] if the old password or the
    ///   bundle is wrong.
    /// - Any error of [`encrypt`](Self::encrypt) for the new password.
    pub fn change_password(
        &self,
        bundle: &EncryptedBundle,
        old_password: &str,
        new_password: &str,
        options: &EncryptOptions,
    ) -> Result<EncryptedBundle> {
        let plaintext = self.decrypt(bundle, old_password)?;

        let kdf = options.kdf.or_else(|| {
            bundle
                .key_derivation
                .params()
                .ok()
                .filter(|p| p.check_encrypt_strength().is_ok())
        });
        let options = EncryptOptions {
            kdf,
            timestamp_ms: options.timestamp_ms,
        };

        let rekeyed = self.encrypt(&plaintext, new_password, &options)?;
        tracing::info!("bundle password changed");
        Ok(rekeyed)
    }
}

/// Full decryption path with differentiated errors.
fn open(bundle: &EncryptedBundle, password: &str) -> Result<Zeroizing<Vec<u8>>> {
    let parts = bundle.parts()?;

    let expected_aad = canonical_aad(bundle.version, bundle.metadata.timestamp, &bundle.algorithm)?;
    if !constant_time_eq(&expected_aad, &parts.aad) {
        return Err(WalletError::CryptoError {
            reason: "AAD does not match bundle header".into(),
        });
    }

    if !constant_time_eq(&sha256(&parts.ciphertext), &parts.checksum) {
        return Err(WalletError::CryptoError {
            reason: "ciphertext checksum mismatch".into(),
        });
    }

    let key = derive_key(password.as_bytes(), &parts.salt, &parts.kdf)?;
    aead::decrypt(
        key.as_bytes(),
        &parts.iv,
        &parts.ciphertext,
        &parts.tag,
        &parts.aad,
    )
}

fn failure_kind(err: &WalletError) -> &'static str {
    match err {
        WalletError::UnsupportedBundleVersion { .. } => "version",
        WalletError::SerializationError { .. } => "schema",
        WalletError::ConfigError { .. } => "kdf",
        _ => "crypto",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
