//! Base58Check encoding for legacy addresses, WIF keys and extended keys.
//!
//! The alphabet is Bitcoin's (no `0`, `O`, `I`, `l`); the checksum is
//! the first 4 bytes of SHA-256d over the version-prefixed payload.

use sparkvault_types::{Result, WalletError};

use crate::ct::constant_time_eq;
use crate::hash::sha256d;

/// Length of the trailing Base58Check checksum.
pub const CHECKSUM_LEN: usize = 4;

/// Encodes raw bytes with the Bitcoin alphabet.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_string()
}

/// Decodes a Base58 string into raw bytes.
///
/// # Errors
///
/// Returns [`WalletError::Base58ChecksumError`] for characters outside
/// the alphabet.
pub fn decode(s: &str) -> Result<Vec<u8>> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| WalletError::Base58ChecksumError {
            reason: format!("invalid base58: {e}"),
        })
}

/// Appends the 4-byte checksum to `data` and Base58-encodes the result.
pub fn encode_check(data: &[u8]) -> String {
    let checksum = sha256d(data);
    let mut buf = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    buf.extend_from_slice(data);
    buf.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    encode(&buf)
}

/// Decodes a Base58Check string and strips the verified checksum.
///
/// # Errors
///
/// Returns [`WalletError::Base58ChecksumError`] for invalid characters,
/// input shorter than the checksum, or a checksum mismatch.
pub fn decode_check(s: &str) -> Result<Vec<u8>> {
    let mut decoded = decode(s)?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(WalletError::Base58ChecksumError {
            reason: "data too short for checksum".into(),
        });
    }
    let split = decoded.len() - CHECKSUM_LEN;
    let expected = sha256d(&decoded[..split]);
    if !constant_time_eq(&decoded[split..], &expected[..CHECKSUM_LEN]) {
        return Err(WalletError::Base58ChecksumError {
            reason: "checksum mismatch".into(),
        });
    }
    decoded.truncate(split);
    Ok(decoded)
}

/// Encodes `version || payload` as Base58Check.
pub fn check_encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(version);
    data.extend_from_slice(payload);
    encode_check(&data)
}

/// Decodes a Base58Check string into `(version, payload)`.
///
/// # Errors
///
/// As [`decode_check`]; additionally an empty payload (no version byte)
/// is rejected.
pub fn check_decode(s: &str) -> Result<(u8, Vec<u8>)> {
    let mut data = decode_check(s)?;
    if data.is_empty() {
        return Err(WalletError::Base58ChecksumError {
            reason: "missing version byte".into(),
        });
    }
    let version = data.remove(0);
    Ok((version, data))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
