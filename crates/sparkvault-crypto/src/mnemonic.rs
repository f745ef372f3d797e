//! BIP39 mnemonic generation, validation, and seed derivation.
//!
//! Supports every BIP39 strength:
//!
//! | Entropy | Checksum | Words |
//! |---------|----------|-------|
//! | 128     | 4        | 12    |
//! | 160     | 5        | 15    |
//! | 192     | 6        | 18    |
//! | 224     | 7        | 21    |
//! | 256     | 8        | 24    |
//!
//! 1. **Generation**: entropy → SHA-256 → first `ENT/32` bits appended
//!    → 11-bit groups → indices into the English wordlist.
//! 2. **Validation**: word count, wordlist membership, then recompute
//!    and compare the checksum bits.
//! 3. **Seed derivation**: NFKD-normalized PBKDF2-HMAC-SHA512 with 2048
//!    rounds and salt `"mnemonic" + passphrase`, producing 64 bytes.
//!
//! Bits are moved through a small accumulator; word indices are always
//! exactly 11 bits and never reduced modulo the list length.
//!
//! Reference: <https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki>

use hmac::Hmac;
use sha2::{Digest, Sha256, Sha512};
use sparkvault_types::{Result, WalletError};
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::ct::constant_time_eq;
use crate::entropy::EntropySource;
use crate::wordlist::{index_to_word, word_to_index};

/// PBKDF2 rounds fixed by BIP39.
const SEED_ROUNDS: u32 = 2048;

/// Valid entropy lengths in bytes.
const ENTROPY_LENGTHS: [usize; 5] = [16, 20, 24, 28, 32];

/// Valid mnemonic word counts.
const WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

// ---------------------------------------------------------------------------
// Mnemonic
// ---------------------------------------------------------------------------

/// A BIP39 mnemonic phrase (space-separated words).
///
/// The inner string is zeroized on drop to prevent sensitive data from
/// lingering in memory.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic(String);

impl Mnemonic {
    /// Parses and validates a phrase, normalizing whitespace.
    pub fn parse(phrase: &str) -> Result<Self> {
        let normalized = normalize_phrase(phrase);
        validate_mnemonic(&normalized)?;
        Ok(Self(normalized.as_str().to_owned()))
    }

    /// Returns the mnemonic phrase as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the individual words.
    pub fn words(&self) -> Vec<&str> {
        self.0.split_whitespace().collect()
    }

    /// Returns the number of words in the mnemonic.
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

// Mnemonic does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// A 64-byte seed derived from a BIP39 mnemonic via PBKDF2-HMAC-SHA512.
///
/// Input to BIP32 master key generation. Automatically zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 64]);

impl Seed {
    /// Fixed byte length of a BIP39 seed.
    pub const LEN: usize = 64;

    /// Creates a [`Seed`] from a raw 64-byte array.
    ///
    /// Use this for reconstructing a seed from stored data or test
    /// vectors. For normal operation, use [`mnemonic_to_seed`].
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 64-byte seed.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

// Seed does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generates a new random BIP39 mnemonic of `entropy_bits` strength.
///
/// Entropy is drawn from the injected source and zeroized afterwards.
///
/// # Errors
///
/// - [`WalletError::InvalidEntropyLength`] if `entropy_bits` is not one
///   of 128, 160, 192, 224, 256.
/// - Any error raised by the entropy source.
pub fn generate_mnemonic(entropy_bits: usize, rng: &dyn EntropySource) -> Result<Mnemonic> {
    if entropy_bits % 8 != 0 || !ENTROPY_LENGTHS.contains(&(entropy_bits / 8)) {
        return Err(WalletError::InvalidEntropyLength { bits: entropy_bits });
    }

    let mut entropy = Zeroizing::new(vec![0u8; entropy_bits / 8]);
    rng.fill_bytes(&mut entropy)?;

    let mnemonic = entropy_to_mnemonic(&entropy)?;
    tracing::debug!(words = mnemonic.word_count(), "mnemonic generated");
    Ok(mnemonic)
}

/// Converts raw entropy into a BIP39 mnemonic.
///
/// This is the deterministic core of mnemonic generation. Exposed for
/// testing with known test vectors.
///
/// # Errors
///
/// - [`WalletError::InvalidEntropyLength`] for lengths outside
///   {16, 20, 24, 28, 32} bytes.
/// - [`WalletError::WordlistIndexError`] if an index falls outside the
///   wordlist (cannot happen for 11-bit groups).
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Mnemonic> {
    if !ENTROPY_LENGTHS.contains(&entropy.len()) {
        return Err(WalletError::InvalidEntropyLength {
            bits: entropy.len() * 8,
        });
    }

    let entropy_bits = entropy.len() * 8;
    let checksum_bits = entropy_bits / 32;
    let word_count = (entropy_bits + checksum_bits) / 11;
    let checksum = Sha256::digest(entropy)[0] >> (8 - checksum_bits);

    let mut words: Vec<&'static str> = Vec::with_capacity(word_count);
    let mut acc: u32 = 0;
    let mut acc_bits: usize = 0;

    let mut push_bits = |value: u32, bits: usize, words: &mut Vec<&'static str>| -> Result<()> {
        acc = (acc << bits) | value;
        acc_bits += bits;
        while acc_bits >= 11 {
            acc_bits -= 11;
            let index = ((acc >> acc_bits) & 0x7FF) as u16;
            words.push(index_to_word(index)?);
            acc &= (1u32 << acc_bits) - 1;
        }
        Ok(())
    };

    for &byte in entropy {
        push_bits(u32::from(byte), 8, &mut words)?;
    }
    push_bits(u32::from(checksum), checksum_bits, &mut words)?;

    acc.zeroize();

    if words.len() != word_count {
        return Err(WalletError::InvalidMnemonicWordCount { count: words.len() });
    }

    Ok(Mnemonic(words.join(" ")))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validates a BIP39 mnemonic phrase.
///
/// # Checks performed
///
/// 1. Word count is 12, 15, 18, 21 or 24.
/// 2. Every word exists in the BIP39 English wordlist.
/// 3. The trailing checksum bits equal the recomputed checksum.
///
/// # Errors
///
/// [`WalletError::InvalidMnemonicWordCount`],
/// [`WalletError::WordlistIndexError`] or
/// [`WalletError::InvalidMnemonicChecksum`], in that order of checking.
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    mnemonic_to_entropy(phrase).map(|_| ())
}

/// Boolean form of [`validate_mnemonic`].
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    validate_mnemonic(phrase).is_ok()
}

/// Recovers the original entropy from a mnemonic after validating it.
pub fn mnemonic_to_entropy(phrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    let normalized = normalize_phrase(phrase);
    let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();

    if !WORD_COUNTS.contains(&words.len()) {
        return Err(WalletError::InvalidMnemonicWordCount { count: words.len() });
    }

    let indices = words
        .iter()
        .map(|w| word_to_index(w))
        .collect::<Result<Vec<u16>>>()?;

    let total_bits = words.len() * 11;
    let checksum_bits = total_bits / 33;
    let entropy_len = (total_bits - checksum_bits) / 8;

    let mut entropy = Zeroizing::new(Vec::with_capacity(entropy_len));
    let mut acc: u32 = 0;
    let mut acc_bits: usize = 0;

    for index in indices {
        acc = (acc << 11) | u32::from(index);
        acc_bits += 11;
        while acc_bits >= 8 && entropy.len() < entropy_len {
            acc_bits -= 8;
            entropy.push((acc >> acc_bits) as u8);
            acc &= (1u32 << acc_bits) - 1;
        }
    }

    // What remains in the accumulator is exactly the checksum.
    let provided = [acc as u8];
    let expected = [Sha256::digest(entropy.as_slice())[0] >> (8 - checksum_bits)];
    acc.zeroize();

    if acc_bits != checksum_bits || !constant_time_eq(&provided, &expected) {
        return Err(WalletError::InvalidMnemonicChecksum);
    }

    Ok(entropy)
}

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Derives a 64-byte seed from a BIP39 mnemonic and optional passphrase.
///
/// - **Password**: the mnemonic sentence, NFKD-normalized, words joined
///   by single spaces.
/// - **Salt**: `"mnemonic"` + NFKD-normalized `passphrase`.
/// - **Algorithm**: PBKDF2-HMAC-SHA512, 2048 rounds, 64-byte output.
///
/// The mnemonic is not validated here; callers that accept user input
/// validate first.
///
/// # Errors
///
/// Returns [`WalletError::CryptoError`] if PBKDF2 computation fails.
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> Result<Seed> {
    let password = normalize_phrase(mnemonic);

    let mut salt = Zeroizing::new(String::with_capacity(8 + passphrase.len()));
    salt.push_str("mnemonic");
    salt.extend(passphrase.nfkd());

    let mut output = [0u8; 64];
    pbkdf2::pbkdf2::<Hmac<Sha512>>(password.as_bytes(), salt.as_bytes(), SEED_ROUNDS, &mut output)
        .map_err(|e| WalletError::CryptoError {
            reason: format!("PBKDF2-HMAC-SHA512 failed: {e}"),
        })?;

    Ok(Seed(output))
}

/// NFKD-normalizes a phrase and collapses any whitespace run to one space.
fn normalize_phrase(phrase: &str) -> Zeroizing<String> {
    let nfkd: Zeroizing<String> = Zeroizing::new(phrase.nfkd().collect());
    let mut out = Zeroizing::new(String::with_capacity(nfkd.len()));
    for (i, word) in nfkd.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{FixedEntropy, OsEntropy};

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon \
                                 abandon abandon abandon abandon abandon about";

    #[test]
    fn generate_word_counts_per_strength() -> std::result::Result<(), WalletError> {
        for (bits, words) in [(128, 12), (160, 15), (192, 18), (224, 21), (256, 24)] {
            let mnemonic = generate_mnemonic(bits, &OsEntropy)?;
            assert_eq!(mnemonic.word_count(), words);
            validate_mnemonic(mnemonic.as_str())?;
        }
        Ok(())
    }

    #[test]
    fn generate_rejects_bad_strength() {
        for bits in [0, 64, 127, 129, 512] {
            assert!(matches!(
                generate_mnemonic(bits, &OsEntropy),
                Err(WalletError::InvalidEntropyLength { .. })
            ));
        }
    }

    #[test]
    fn generate_uses_injected_source() -> std::result::Result<(), WalletError> {
        let source = FixedEntropy::new(vec![0u8])?;
        let mnemonic = generate_mnemonic(128, &source)?;
        assert_eq!(mnemonic.as_str(), ABANDON_ABOUT);
        Ok(())
    }

    #[test]
    fn entropy_all_zeros_128() -> std::result::Result<(), WalletError> {
        let mnemonic = entropy_to_mnemonic(&[0u8; 16])?;
        let words = mnemonic.words();
        assert_eq!(words.len(), 12);
        assert!(words[..11].iter().all(|w| *w == "abandon"));
        assert_eq!(words[11], "about");
        Ok(())
    }

    #[test]
    fn entropy_all_ff_256() -> std::result::Result<(), WalletError> {
        let mnemonic = entropy_to_mnemonic(&[0xFFu8; 32])?;
        let words = mnemonic.words();
        assert_eq!(words.len(), 24);
        assert!(words[..23].iter().all(|w| *w == "zoo"));
        assert_eq!(words[23], "vote");
        Ok(())
    }

    #[test]
    fn entropy_length_rejected() {
        for len in [0, 15, 17, 33, 64] {
            let entropy = vec![0u8; len];
            assert!(matches!(
                entropy_to_mnemonic(&entropy),
                Err(WalletError::InvalidEntropyLength { .. })
            ));
        }
    }

    #[test]
    fn entropy_roundtrip_all_strengths() -> std::result::Result<(), WalletError> {
        for len in ENTROPY_LENGTHS {
            let entropy: Vec<u8> = (0..len as u8).map(|b| b.wrapping_mul(37)).collect();
            let mnemonic = entropy_to_mnemonic(&entropy)?;
            let recovered = mnemonic_to_entropy(mnemonic.as_str())?;
            assert_eq!(recovered.as_slice(), entropy.as_slice());
        }
        Ok(())
    }

    #[test]
    fn validate_rejects_wrong_word_count() {
        assert!(matches!(
            validate_mnemonic("abandon abandon abandon"),
            Err(WalletError::InvalidMnemonicWordCount { count: 3 })
        ));
    }

    #[test]
    fn validate_rejects_unknown_word() {
        let mut words = vec!["abandon"; 12];
        words[5] = "notaword";
        assert!(matches!(
            validate_mnemonic(&words.join(" ")),
            Err(WalletError::WordlistIndexError { .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_checksum() {
        let phrase = vec!["abandon"; 12].join(" ");
        assert!(matches!(
            validate_mnemonic(&phrase),
            Err(WalletError::InvalidMnemonicChecksum)
        ));
        assert!(!is_valid_mnemonic(&phrase));
    }

    #[test]
    fn validate_tolerates_extra_whitespace() {
        let messy = format!("  {}\n", ABANDON_ABOUT.replace(' ', "   "));
        assert!(is_valid_mnemonic(&messy));
    }

    #[test]
    fn parse_normalizes_whitespace() -> std::result::Result<(), WalletError> {
        let mnemonic = Mnemonic::parse(
            "abandon  abandon abandon abandon abandon abandon\tabandon \
             abandon abandon abandon abandon about",
        )?;
        assert_eq!(mnemonic.word_count(), 12);
        assert!(!mnemonic.as_str().contains("  "));
        Ok(())
    }

    /// TREZOR BIP39 vector: 128-bit zero entropy, passphrase "TREZOR".
    #[test]
    fn seed_derivation_trezor_vector() -> std::result::Result<(), WalletError> {
        let seed = mnemonic_to_seed(ABANDON_ABOUT, "TREZOR")?;
        let expected = "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553\
                        1f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04";
        assert_eq!(to_hex(seed.as_bytes()), expected);
        Ok(())
    }

    #[test]
    fn seed_whitespace_is_normalized() -> std::result::Result<(), WalletError> {
        let messy = ABANDON_ABOUT.replace(' ', "  ");
        let a = mnemonic_to_seed(ABANDON_ABOUT, "TREZOR")?;
        let b = mnemonic_to_seed(&messy, "TREZOR")?;
        assert_eq!(a.as_bytes(), b.as_bytes());
        Ok(())
    }

    #[test]
    fn seed_passphrase_is_nfkd_normalized() -> std::result::Result<(), WalletError> {
        // U+00E9 (precomposed) vs "e" + U+0301 (decomposed).
        let composed = mnemonic_to_seed(ABANDON_ABOUT, "caf\u{00e9}")?;
        let decomposed = mnemonic_to_seed(ABANDON_ABOUT, "cafe\u{0301}")?;
        assert_eq!(composed.as_bytes(), decomposed.as_bytes());
        Ok(())
    }

    #[test]
    fn seed_with_empty_passphrase_differs() -> std::result::Result<(), WalletError> {
        let seed_no_pass = mnemonic_to_seed(ABANDON_ABOUT, "")?;
        let seed_with_pass = mnemonic_to_seed(ABANDON_ABOUT, "TREZOR")?;
        assert_ne!(seed_no_pass.as_bytes(), seed_with_pass.as_bytes());
        Ok(())
    }

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
