//! AES-256-GCM authenticated encryption with associated data.
//!
//! Bundles use a 128-bit (16-byte) IV rather than GCM's 96-bit default;
//! the counter block is then derived through GHASH as GCM specifies for
//! non-96-bit IVs. The 16-byte tag is kept detached from the ciphertext
//! so it can be stored in its own field.
//!
//! IVs are generated from the injected entropy source and **must never
//! be reused** with the same key.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};
use sparkvault_types::{Result, WalletError};
use zeroize::Zeroizing;

use crate::entropy::EntropySource;

/// AES-256-GCM with a 16-byte IV.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// IV length in bytes.
pub const IV_LEN: usize = 16;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Key length in bytes.
pub const KEY_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Iv
// ---------------------------------------------------------------------------

/// 128-bit GCM initialization vector.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Iv([u8; IV_LEN]);

impl Iv {
    /// Creates an [`Iv`] from raw bytes.
    pub fn from_bytes(bytes: [u8; IV_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 16-byte array.
    pub fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }

    /// Draws a fresh IV from `rng`.
    pub fn generate(rng: &dyn EntropySource) -> Result<Self> {
        let mut bytes = [0u8; IV_LEN];
        rng.fill_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }
}

// ---------------------------------------------------------------------------
// Sealed
// ---------------------------------------------------------------------------

/// Ciphertext and detached tag produced by [`encrypt`].
#[derive(Clone, Debug)]
pub struct Sealed {
    /// Encrypted payload, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// 16-byte GCM authentication tag.
    pub tag: [u8; TAG_LEN],
}

// ---------------------------------------------------------------------------
// Encrypt / Decrypt
// ---------------------------------------------------------------------------

/// Encrypts `plaintext` with AES-256-GCM.
///
/// `aad` is authenticated but **not** encrypted.
pub fn encrypt(key: &[u8; KEY_LEN], iv: &Iv, plaintext: &[u8], aad: &[u8]) -> Result<Sealed> {
    let cipher = cipher(key)?;
    let mut buffer = plaintext.to_vec();

    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv.0), aad, &mut buffer)
        .map_err(|e| WalletError::CryptoError {
            reason: format!("AES-256-GCM encryption failed: {e}"),
        })?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);
    Ok(Sealed {
        ciphertext: buffer,
        tag: tag_bytes,
    })
}

/// Decrypts `ciphertext` with AES-256-GCM and verifies `tag`.
///
/// # Errors
///
/// Returns [`WalletError::CryptoError`] if tag verification fails
/// (wrong key, wrong IV, tampered ciphertext or AAD).
pub fn decrypt(
    key: &[u8; KEY_LEN],
    iv: &Iv,
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = cipher(key)?;
    let mut buffer = Zeroizing::new(ciphertext.to_vec());

    cipher
        .decrypt_in_place_detached(
            Nonce::<U16>::from_slice(&iv.0),
            aad,
            buffer.as_mut_slice(),
            Tag::<U16>::from_slice(tag),
        )
        .map_err(|e| WalletError::CryptoError {
            reason: format!("AES-256-GCM decryption failed: {e}"),
        })?;

    Ok(buffer)
}

fn cipher(key: &[u8; KEY_LEN]) -> Result<Aes256Gcm16> {
    Aes256Gcm16::new_from_slice(key).map_err(|e| WalletError::CryptoError {
        reason: format!("AES-256-GCM key init failed: {e}"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::OsEntropy;

    const KEY: [u8; 32] = [0x42; 32];

    #[test]
    fn roundtrip() -> std::result::Result<(), WalletError> {
        let iv = Iv::generate(&OsEntropy)?;
        let sealed = encrypt(&KEY, &iv, b"attack at dawn", b"header")?;
        assert_eq!(sealed.ciphertext.len(), 14);
        assert_ne!(sealed.ciphertext.as_slice(), b"attack at dawn");

        let plaintext = decrypt(&KEY, &iv, &sealed.ciphertext, &sealed.tag, b"header")?;
        assert_eq!(plaintext.as_slice(), b"attack at dawn");
        Ok(())
    }

    #[test]
    fn empty_plaintext() -> std::result::Result<(), WalletError> {
        let iv = Iv::from_bytes([7u8; IV_LEN]);
        let sealed = encrypt(&KEY, &iv, b"", b"")?;
        assert!(sealed.ciphertext.is_empty());
        assert!(decrypt(&KEY, &iv, &sealed.ciphertext, &sealed.tag, b"")?.is_empty());
        Ok(())
    }

    #[test]
    fn wrong_key_fails() -> std::result::Result<(), WalletError> {
        let iv = Iv::from_bytes([1u8; IV_LEN]);
        let sealed = encrypt(&KEY, &iv, b"secret", b"")?;
        assert!(decrypt(&[0x43; 32], &iv, &sealed.ciphertext, &sealed.tag, b"").is_err());
        Ok(())
    }

    #[test]
    fn tampered_ciphertext_fails() -> std::result::Result<(), WalletError> {
        let iv = Iv::from_bytes([1u8; IV_LEN]);
        let mut sealed = encrypt(&KEY, &iv, b"secret", b"")?;
        sealed.ciphertext[0] ^= 0x01;
        assert!(decrypt(&KEY, &iv, &sealed.ciphertext, &sealed.tag, b"").is_err());
        Ok(())
    }

    #[test]
    fn tampered_tag_fails() -> std::result::Result<(), WalletError> {
        let iv = Iv::from_bytes([1u8; IV_LEN]);
        let mut sealed = encrypt(&KEY, &iv, b"secret", b"")?;
        sealed.tag[15] ^= 0x80;
        assert!(decrypt(&KEY, &iv, &sealed.ciphertext, &sealed.tag, b"").is_err());
        Ok(())
    }

    #[test]
    fn wrong_aad_fails() -> std::result::Result<(), WalletError> {
        let iv = Iv::from_bytes([1u8; IV_LEN]);
        let sealed = encrypt(&KEY, &iv, b"secret", b"v1")?;
        assert!(decrypt(&KEY, &iv, &sealed.ciphertext, &sealed.tag, b"v2").is_err());
        Ok(())
    }

    #[test]
    fn wrong_iv_fails() -> std::result::Result<(), WalletError> {
        let sealed = encrypt(&KEY, &Iv::from_bytes([1u8; IV_LEN]), b"secret", b"")?;
        let other = Iv::from_bytes([2u8; IV_LEN]);
        assert!(decrypt(&KEY, &other, &sealed.ciphertext, &sealed.tag, b"").is_err());
        Ok(())
    }
}
