//! Wallet generation, import and payload encryption.
//!
//! [`WalletEngine`] is the entry point for callers outside the engine
//! (UI, REST or CLI layers). It ties the pieces together:
//!
//! ```text
//! entropy ─► mnemonic ─► seed ─► master key ─► account keys ─┬─► addresses
//!                                                            └─► WIF keys
//! payload + password ─► EncryptionVault ─► EncryptedBundle
//! ```
//!
//! Every account is derived along a BIP43-style path
//! `m/purpose'/coin'/account'/0/index` where the purpose depends on the
//! address scheme: 44 (P2PKH), 49 (P2SH-P2WPKH), 84 (SegwitV0), 86
//! (Taproot) and the configured Spark purpose.

use std::sync::Arc;

use serde::Serialize;
use sparkvault_crypto::address::{encode_address, SparkScheme};
use sparkvault_crypto::entropy::{EntropySource, OsEntropy};
use sparkvault_crypto::hd_derive::{bip_path, ExtendedPrivateKey};
use sparkvault_crypto::mnemonic::{generate_mnemonic, mnemonic_to_seed, Mnemonic, Seed};
use sparkvault_crypto::wif::encode_wif;
use sparkvault_types::config::EngineConfig;
use sparkvault_types::{AddressKind, Network, Result};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::bundle::EncryptedBundle;
use crate::vault::{EncryptOptions, EncryptionVault};

/// Receive chain in `m/purpose'/coin'/account'/change/index`.
const RECEIVE_CHAIN: u32 = 0;

// ---------------------------------------------------------------------------
// Export types
// ---------------------------------------------------------------------------

/// One derived account key under a single address scheme.
#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
pub struct AccountExport {
    /// Address scheme.
    #[zeroize(skip)]
    pub kind: AddressKind,
    /// Derivation path, e.g. `m/84'/0'/0'/0/0`.
    pub path: String,
    /// Encoded address.
    pub address: String,
    /// Hex-encoded compressed public key.
    pub public_key: String,
    /// Compressed-key WIF of the private key.
    pub wif: String,
}

// AccountExport does not implement Clone/Debug to prevent leakage.

/// Everything a caller needs to present a freshly generated or
/// imported wallet.
#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
pub struct WalletExport {
    /// Space-separated BIP39 phrase.
    pub mnemonic: String,
    /// Network the addresses and WIF keys were encoded for.
    #[zeroize(skip)]
    pub network: Network,
    /// Hex-encoded fingerprint of the master public key.
    pub master_fingerprint: String,
    /// Accounts in scheme order, `addresses_per_scheme` per scheme.
    pub accounts: Vec<AccountExport>,
}

// WalletExport does not implement Clone/Debug to prevent leakage.

impl WalletExport {
    /// Accounts of a single scheme.
    pub fn accounts_of(&self, kind: AddressKind) -> impl Iterator<Item = &AccountExport> {
        self.accounts.iter().filter(move |a| a.kind == kind)
    }

    /// First account of a scheme, if any were exported.
    pub fn first(&self, kind: AddressKind) -> Option<&AccountExport> {
        self.accounts_of(kind).next()
    }
}

// ---------------------------------------------------------------------------
// WalletEngine
// ---------------------------------------------------------------------------

/// Key engine facade.
///
/// Cheap to clone; clones share configuration and entropy source.
#[derive(Clone)]
pub struct WalletEngine {
    config: Arc<EngineConfig>,
    spark: Arc<SparkScheme>,
    rng: Arc<dyn EntropySource>,
    vault: EncryptionVault,
}

impl WalletEngine {
    /// Creates an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`sparkvault_types::WalletError::ConfigError`] if `config`
    /// is invalid.
    pub fn new(config: EngineConfig, rng: Arc<dyn EntropySource>) -> Result<Self> {
        let vault = EncryptionVault::from_config(&config, Arc::clone(&rng))?;
        let spark = SparkScheme::from_config(&config);
        tracing::debug!(
            network = %config.network,
            kdf = vault.default_kdf().method_name(),
            "wallet engine ready"
        );
        Ok(Self {
            config: Arc::new(config),
            spark: Arc::new(spark),
            rng,
            vault,
        })
    }

    /// Creates an engine backed by the operating-system CSPRNG.
    pub fn with_os_entropy(config: EngineConfig) -> Result<Self> {
        Self::new(config, Arc::new(OsEntropy))
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Spark scheme parameters in use.
    pub fn spark_scheme(&self) -> &SparkScheme {
        &self.spark
    }

    /// Underlying vault.
    pub fn vault(&self) -> &EncryptionVault {
        &self.vault
    }

    /// Generates a new wallet with `strength_bits` of entropy.
    ///
    /// The mnemonic is returned without a passphrase applied to the
    /// derived keys.
    ///
    /// # Errors
    ///
    /// - [`sparkvault_types::WalletError::InvalidEntropyLength`] for an
    ///   unsupported strength.
    /// - [`sparkvault_types::WalletError::InvalidChildKey`] in the
    ///   (astronomically unlikely) case an account index is invalid.
    pub fn generate_wallet(&self, strength_bits: usize, network: Network) -> Result<WalletExport> {
        let mnemonic = generate_mnemonic(strength_bits, self.rng.as_ref())?;
        tracing::info!(strength_bits, %network, "wallet generated");
        self.export(mnemonic, "", network)
    }

    /// Restores a wallet from an existing mnemonic and optional
    /// passphrase.
    ///
    /// # Errors
    ///
    /// Mnemonic validation errors (word count, unknown word, checksum)
    /// and derivation errors.
    pub fn import_wallet(
        &self,
        mnemonic: &str,
        passphrase: &str,
        network: Network,
    ) -> Result<WalletExport> {
        let mnemonic = Mnemonic::parse(mnemonic)?;
        tracing::info!(words = mnemonic.word_count(), %network, "wallet imported");
        self.export(mnemonic, passphrase, network)
    }

    /// Derives a single account key from a seed.
    pub fn derive_account(
        &self,
        seed: &Seed,
        kind: AddressKind,
        network: Network,
        account: u32,
        index: u32,
    ) -> Result<AccountExport> {
        let master = ExtendedPrivateKey::master_from_seed(seed)?;
        self.account_from_master(&master, kind, network, account, index)
    }

    /// Encrypts `payload` with the engine's default KDF.
    pub fn encrypt_payload(&self, payload: &[u8], password: &str) -> Result<EncryptedBundle> {
        self.vault
            .encrypt(payload, password, &EncryptOptions::default())
    }

    /// Decrypts a bundle produced by [`encrypt_payload`](Self::encrypt_payload).
    ///
    /// # Errors
    ///
    /// Always [`sparkvault_types::WalletError::DecryptionFailure`].
    pub fn decrypt_payload(
        &self,
        bundle: &EncryptedBundle,
        password: &str,
    ) -> Result<Zeroizing<Vec<u8>>> {
        self.vault.decrypt(bundle, password)
    }

    /// Derivation purpose of an address scheme.
    pub fn purpose(&self, kind: AddressKind) -> u32 {
        match kind {
            AddressKind::P2pkh => 44,
            AddressKind::P2sh => 49,
            AddressKind::SegwitV0 => 84,
            AddressKind::Taproot => 86,
            AddressKind::Spark => self.spark.purpose,
        }
    }

    fn export(&self, mnemonic: Mnemonic, passphrase: &str, network: Network) -> Result<WalletExport> {
        let seed = mnemonic_to_seed(mnemonic.as_str(), passphrase)?;
        let master = ExtendedPrivateKey::master_from_seed(&seed)?;

        let per_scheme = self.config.addresses_per_scheme;
        let mut accounts = Vec::with_capacity(AddressKind::ALL.len() * per_scheme as usize);
        for kind in AddressKind::ALL {
            for index in 0..per_scheme {
                accounts.push(self.account_from_master(&master, kind, network, 0, index)?);
            }
        }

        Ok(WalletExport {
            mnemonic: mnemonic.as_str().to_owned(),
            network,
            master_fingerprint: hex::encode(master.fingerprint()?),
            accounts,
        })
    }

    fn account_from_master(
        &self,
        master: &ExtendedPrivateKey,
        kind: AddressKind,
        network: Network,
        account: u32,
        index: u32,
    ) -> Result<AccountExport> {
        let path = bip_path(
            self.purpose(kind),
            network.coin_type(),
            account,
            RECEIVE_CHAIN,
            index,
        )?;
        let key = master.derive_path(&path)?;
        let public_key = key.public_key()?;

        Ok(AccountExport {
            kind,
            path: path.to_string(),
            address: encode_address(kind, &public_key, network, &self.spark)?,
            public_key: hex::encode(public_key),
            wif: encode_wif(key.private_key(), network, true),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
