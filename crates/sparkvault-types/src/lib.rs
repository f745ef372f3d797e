//! Core shared types for the sparkvault key engine.
//!
//! This crate defines the types every other crate in the workspace
//! agrees on: the Bitcoin [`Network`], the [`AddressKind`] tag, the
//! [`WalletError`] taxonomy and the [`Result`] alias. Engine tuning
//! lives in [`config`].

pub mod config;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Bitcoin network a key or address belongs to.
///
/// Selects every network-dependent constant: WIF and Base58 version
/// bytes, the segwit HRP, the BIP44 coin type and the extended key
/// version prefixes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Bitcoin mainnet.
    #[default]
    Mainnet,
    /// Bitcoin testnet (also used for signet/regtest key material).
    Testnet,
}

impl Network {
    /// Version byte prefixed to WIF-encoded private keys.
    pub fn wif_version(self) -> u8 {
        match self {
            Self::Mainnet => 0x80,
            Self::Testnet => 0xef,
        }
    }

    /// Version byte of Base58Check pay-to-pubkey-hash addresses.
    pub fn p2pkh_version(self) -> u8 {
        match self {
            Self::Mainnet => 0x00,
            Self::Testnet => 0x6f,
        }
    }

    /// Version byte of Base58Check pay-to-script-hash addresses.
    pub fn p2sh_version(self) -> u8 {
        match self {
            Self::Mainnet => 0x05,
            Self::Testnet => 0xc4,
        }
    }

    /// Human-readable part of segwit addresses.
    pub fn segwit_hrp(self) -> &'static str {
        match self {
            Self::Mainnet => "bc",
            Self::Testnet => "tb",
        }
    }

    /// BIP44 coin type (hardened at derivation time).
    pub fn coin_type(self) -> u32 {
        match self {
            Self::Mainnet => 0,
            Self::Testnet => 1,
        }
    }

    /// BIP32 version prefix for serialized extended private keys.
    pub fn xprv_version(self) -> [u8; 4] {
        match self {
            Self::Mainnet => [0x04, 0x88, 0xAD, 0xE4],
            Self::Testnet => [0x04, 0x35, 0x83, 0x94],
        }
    }

    /// BIP32 version prefix for serialized extended public keys.
    pub fn xpub_version(self) -> [u8; 4] {
        match self {
            Self::Mainnet => [0x04, 0x88, 0xB2, 0x1E],
            Self::Testnet => [0x04, 0x35, 0x87, 0xCF],
        }
    }

    /// Resolves a WIF version byte back to its network.
    pub fn from_wif_version(version: u8) -> Option<Self> {
        match version {
            0x80 => Some(Self::Mainnet),
            0xef => Some(Self::Testnet),
            _ => None,
        }
    }

    /// Resolves a segwit HRP back to its network.
    pub fn from_segwit_hrp(hrp: &str) -> Option<Self> {
        match hrp {
            "bc" => Some(Self::Mainnet),
            "tb" => Some(Self::Testnet),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = WalletError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            other => Err(WalletError::ConfigError {
                reason: format!("unknown network '{other}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// AddressKind
// ---------------------------------------------------------------------------

/// Address scheme tag.
///
/// `Spark` is an application-defined layer-2 scheme, not a Bitcoin
/// output type; it shares the Bech32m checksum but nothing else.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    /// Base58Check pay-to-pubkey-hash (`1…` / `m…`).
    P2pkh,
    /// Base58Check pay-to-script-hash (`3…` / `2…`).
    P2sh,
    /// Bech32 witness v0 key hash (`bc1q…`).
    SegwitV0,
    /// Bech32m witness v1 tweaked x-only key (`bc1p…`).
    Taproot,
    /// Layer-2 Spark address (`sp1…`).
    Spark,
}

impl AddressKind {
    /// Every supported scheme, in the order wallets are exported.
    pub const ALL: [AddressKind; 5] = [
        AddressKind::P2pkh,
        AddressKind::P2sh,
        AddressKind::SegwitV0,
        AddressKind::Taproot,
        AddressKind::Spark,
    ];
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P2pkh => write!(f, "p2pkh"),
            Self::P2sh => write!(f, "p2sh"),
            Self::SegwitV0 => write!(f, "segwit_v0"),
            Self::Taproot => write!(f, "taproot"),
            Self::Spark => write!(f, "spark"),
        }
    }
}

impl FromStr for AddressKind {
    type Err = WalletError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "p2pkh" | "legacy" => Ok(Self::P2pkh),
            "p2sh" | "p2sh-p2wpkh" | "nested" => Ok(Self::P2sh),
            "segwit_v0" | "segwit" | "p2wpkh" => Ok(Self::SegwitV0),
            "taproot" | "p2tr" => Ok(Self::Taproot),
            "spark" => Ok(Self::Spark),
            other => Err(WalletError::UnsupportedAddressScheme {
                reason: format!("unknown address scheme '{other}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// WalletError
// ---------------------------------------------------------------------------

/// Central error type for the sparkvault engine.
///
/// Every validation failure is reported synchronously through one of
/// these variants and never leaves a partially built value behind.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Entropy is not 128, 160, 192, 224 or 256 bits long.
    #[error("invalid entropy length: {bits} bits")]
    InvalidEntropyLength {
        /// Offending length in bits.
        bits: usize,
    },

    /// A word is missing from the wordlist or an index is outside it.
    #[error("wordlist index error: {reason}")]
    WordlistIndexError {
        /// Human-readable description of the lookup failure.
        reason: String,
    },

    /// The trailing checksum bits of a mnemonic do not match its entropy.
    #[error("invalid mnemonic checksum")]
    InvalidMnemonicChecksum,

    /// A mnemonic does not have 12, 15, 18, 21 or 24 words.
    #[error("invalid mnemonic word count: {count}")]
    InvalidMnemonicWordCount {
        /// Number of words supplied.
        count: usize,
    },

    /// BIP32 child derivation produced an out-of-range or zero key.
    ///
    /// The caller decides whether to retry with `index + 1`.
    #[error("invalid child key at index {index}")]
    InvalidChildKey {
        /// Child index (without the hardened bit) that failed.
        index: u32,
    },

    /// A derivation path string is malformed.
    #[error("invalid derivation path: {reason}")]
    InvalidDerivationPath {
        /// Human-readable description of the parse failure.
        reason: String,
    },

    /// The requested or detected address scheme is not supported.
    #[error("unsupported address scheme: {reason}")]
    UnsupportedAddressScheme {
        /// Human-readable description of the scheme problem.
        reason: String,
    },

    /// A Bech32/Bech32m string failed character, case or checksum checks.
    #[error("bech32 checksum error: {reason}")]
    Bech32ChecksumError {
        /// Human-readable description of the decoding failure.
        reason: String,
    },

    /// A Base58Check string failed alphabet or checksum checks.
    #[error("base58 checksum error: {reason}")]
    Base58ChecksumError {
        /// Human-readable description of the decoding failure.
        reason: String,
    },

    /// An address decoded cleanly but is not valid for the context.
    #[error("invalid address: {reason}")]
    InvalidAddress {
        /// Human-readable description of why the address is invalid.
        reason: String,
    },

    /// Key material is malformed (wrong length, outside the curve order).
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Human-readable description of the key problem.
        reason: String,
    },

    /// A WIF string decoded but its layout is invalid.
    #[error("invalid WIF: {reason}")]
    InvalidWif {
        /// Human-readable description of the WIF problem.
        reason: String,
    },

    /// A password was rejected by the password policy.
    #[error("weak password: {reason}")]
    WeakPasswordError {
        /// Which rule rejected the password.
        reason: String,
    },

    /// Decryption of an encrypted bundle failed.
    ///
    /// Deliberately carries no detail: wrong password, tampering,
    /// checksum mismatch and malformed bundles are indistinguishable.
    #[error("decryption failed")]
    DecryptionFailure,

    /// A bundle carries a format version this build cannot read.
    #[error("unsupported bundle version: {version}")]
    UnsupportedBundleVersion {
        /// Version found in the bundle.
        version: u32,
    },

    /// A cryptographic primitive failed unexpectedly.
    #[error("crypto error: {reason}")]
    CryptoError {
        /// Human-readable description of the cryptographic failure.
        reason: String,
    },

    /// A configuration value is invalid or missing.
    #[error("config error: {reason}")]
    ConfigError {
        /// Human-readable description of the configuration problem.
        reason: String,
    },

    /// Reading or writing a bundle file failed.
    #[error("storage error: {reason}")]
    StorageError {
        /// Human-readable description of the storage failure.
        reason: String,
    },

    /// JSON (de)serialization of a bundle or config failed.
    #[error("serialization error: {reason}")]
    SerializationError {
        /// Human-readable description of the serialization failure.
        reason: String,
    },

    /// A background computation was abandoned before it completed.
    #[error("operation cancelled: {reason}")]
    Cancelled {
        /// Human-readable description of why the task ended.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Result alias
// ---------------------------------------------------------------------------

/// Convenience result type using [`WalletError`].
pub type Result<T> = std::result::Result<T, WalletError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_constants() {
        assert_eq!(Network::Mainnet.wif_version(), 0x80);
        assert_eq!(Network::Testnet.wif_version(), 0xef);
        assert_eq!(Network::Mainnet.segwit_hrp(), "bc");
        assert_eq!(Network::Testnet.segwit_hrp(), "tb");
        assert_eq!(Network::Mainnet.p2pkh_version(), 0x00);
        assert_eq!(Network::Testnet.p2sh_version(), 0xc4);
    }

    #[test]
    fn network_reverse_lookups() {
        assert_eq!(Network::from_wif_version(0x80), Some(Network::Mainnet));
        assert_eq!(Network::from_wif_version(0xef), Some(Network::Testnet));
        assert_eq!(Network::from_wif_version(0x00), None);
        assert_eq!(Network::from_segwit_hrp("tb"), Some(Network::Testnet));
        assert_eq!(Network::from_segwit_hrp("sp"), None);
    }

    #[test]
    fn network_parse_and_display() -> std::result::Result<(), WalletError> {
        assert_eq!("mainnet".parse::<Network>()?, Network::Mainnet);
        assert_eq!("TESTNET".parse::<Network>()?, Network::Testnet);
        assert_eq!(Network::Testnet.to_string(), "testnet");
        assert!("regtest-ish".parse::<Network>().is_err());
        Ok(())
    }

    #[test]
    fn address_kind_roundtrip_display() -> std::result::Result<(), WalletError> {
        for kind in AddressKind::ALL {
            let parsed: AddressKind = kind.to_string().parse()?;
            assert_eq!(parsed, kind);
        }
        Ok(())
    }

    #[test]
    fn address_kind_unknown_is_unsupported_scheme() {
        let result = "p2wsh-multisig".parse::<AddressKind>();
        assert!(matches!(
            result,
            Err(WalletError::UnsupportedAddressScheme { .. })
        ));
    }

    #[test]
    fn network_serde_json_roundtrip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(&Network::Testnet)?;
        assert_eq!(json, "\"testnet\"");
        let parsed: Network = serde_json::from_str(&json)?;
        assert_eq!(parsed, Network::Testnet);
        Ok(())
    }

    #[test]
    fn decryption_failure_message_is_generic() {
        let msg = WalletError::DecryptionFailure.to_string();
        assert_eq!(msg, "decryption failed");
    }

    #[test]
    fn error_display_includes_reason() {
        let err = WalletError::InvalidAddress {
            reason: "too short".into(),
        };
        assert!(err.to_string().contains("too short"));
    }
}
