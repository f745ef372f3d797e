//! Wallet Import Format (WIF) private keys.
//!
//! `Base58Check(version || key32 [|| 0x01])`, where the trailing `0x01`
//! marks that the key's public key is used in compressed form. Version
//! is `0x80` on mainnet and `0xef` on testnet.

use sparkvault_types::{Network, Result, WalletError};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::base58;
use crate::hd_derive::parse_scalar;

/// Compression flag appended to compressed-key WIFs.
const COMPRESSED_FLAG: u8 = 0x01;

/// A private key recovered from a WIF string.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct WifKey {
    private_key: [u8; 32],
    #[zeroize(skip)]
    network: Network,
    compressed: bool,
}

// WifKey does not implement Clone/Debug to prevent leakage.

impl WifKey {
    /// The raw 32-byte private key.
    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    /// The network named by the version byte.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Whether the compressed-public-key flag is set.
    pub fn compressed(&self) -> bool {
        self.compressed
    }
}

/// Encodes a private key as WIF.
pub fn encode_wif(private_key: &[u8; 32], network: Network, compressed: bool) -> String {
    let mut payload = [0u8; 33];
    payload[..32].copy_from_slice(private_key);
    payload[32] = COMPRESSED_FLAG;

    let len = if compressed { 33 } else { 32 };
    let encoded = base58::check_encode(network.wif_version(), &payload[..len]);
    payload.zeroize();
    encoded
}

/// Decodes and validates a WIF string.
///
/// # Errors
///
/// - [`WalletError::Base58ChecksumError`] for bad characters or checksum.
/// - [`WalletError::InvalidWif`] for an unknown version byte, a decoded
///   length other than 37/38 bytes (checksum included), a compression
///   flag other than `0x01`, or a key outside `1..n`.
pub fn decode_wif(s: &str) -> Result<WifKey> {
    let (version, mut payload) = base58::check_decode(s)?;
    let result = parse_payload(version, &payload);
    payload.zeroize();
    result
}

fn parse_payload(version: u8, payload: &[u8]) -> Result<WifKey> {
    let network = Network::from_wif_version(version).ok_or_else(|| WalletError::InvalidWif {
        reason: format!("unknown WIF version byte 0x{version:02x}"),
    })?;

    let compressed = match payload.len() {
        32 => false,
        33 if payload[32] == COMPRESSED_FLAG => true,
        33 => {
            return Err(WalletError::InvalidWif {
                reason: format!("invalid compression flag 0x{:02x}", payload[32]),
            })
        }
        n => {
            return Err(WalletError::InvalidWif {
                reason: format!("decoded WIF is {} bytes, expected 37 or 38", n + 1 + 4),
            })
        }
    };

    let mut private_key = [0u8; 32];
    private_key.copy_from_slice(&payload[..32]);
    if parse_scalar(&private_key).is_err() {
        private_key.zeroize();
        return Err(WalletError::InvalidWif {
            reason: "private key is zero or not below the secp256k1 order".into(),
        });
    }

    Ok(WifKey {
        private_key,
        network,
        compressed,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
