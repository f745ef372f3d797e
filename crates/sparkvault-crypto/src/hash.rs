//! Hash functions used across key derivation and address encoding.
//!
//! Bitcoin mixes several digests: SHA-256 for checksums and BIP340
//! tagged hashes, `hash160 = RIPEMD-160(SHA-256(x))` for key and script
//! hashes, and HMAC-SHA512 for BIP32.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use sparkvault_types::{Result, WalletError};

/// HMAC-SHA512 type alias used by BIP32.
type HmacSha512 = Hmac<Sha512>;

/// Computes the SHA-256 hash of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Computes double SHA-256, `SHA-256(SHA-256(data))`.
///
/// The first 4 bytes form the Base58Check checksum.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Computes `RIPEMD-160(SHA-256(data))`.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

/// BIP340 tagged hash: `SHA-256(SHA-256(tag) || SHA-256(tag) || data)`.
pub fn tagged_hash(tag: &str, data: &[u8]) -> [u8; 32] {
    let tag_hash = sha256(tag.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes HMAC-SHA512 and returns the 64-byte output.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key).map_err(|e| WalletError::CryptoError {
        reason: format!("HMAC-SHA512 key init failed: {e}"),
    })?;
    mac.update(data);
    let result = mac.finalize().into_bytes();

    let mut output = [0u8; 64];
    output.copy_from_slice(&result);
    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn sha256_abc() {
        assert_eq!(
            to_hex(&sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256d_empty() {
        assert_eq!(
            to_hex(&sha256d(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn hash160_of_generator_pubkey() {
        // Compressed SEC1 encoding of the secp256k1 generator (private key 1).
        let pubkey = [
            0x02, 0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95,
            0xce, 0x87, 0x0b, 0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59,
            0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98,
        ];
        assert_eq!(
            to_hex(&hash160(&pubkey)),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn tagged_hash_is_domain_separated() {
        let a = tagged_hash("TapTweak", b"payload");
        let b = tagged_hash("TapLeaf", b"payload");
        assert_ne!(a, b);
        assert_ne!(a, sha256(b"payload"));
    }

    /// RFC 4231 test case 2.
    #[test]
    fn hmac_sha512_rfc4231_case2() -> std::result::Result<(), WalletError> {
        let out = hmac_sha512(b"Jefe", b"what do ya want for nothing?")?;
        assert_eq!(
            to_hex(&out),
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
        Ok(())
    }
}
