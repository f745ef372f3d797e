//! BIP39 English wordlist lookups.
//!
//! The 2048-word list itself is consumed from the `bip39` crate; this
//! module only maps between words and 11-bit indices.

use bip39::Language;
use sparkvault_types::{Result, WalletError};

/// Number of words in a BIP39 wordlist.
pub const WORDLIST_LEN: usize = 2048;

/// Returns the full, alphabetically sorted English wordlist.
pub fn wordlist() -> &'static [&'static str; WORDLIST_LEN] {
    Language::English.word_list()
}

/// Returns the word at `index`.
///
/// # Errors
///
/// Returns [`WalletError::WordlistIndexError`] if `index >= 2048`.
pub fn index_to_word(index: u16) -> Result<&'static str> {
    wordlist()
        .get(usize::from(index))
        .copied()
        .ok_or_else(|| WalletError::WordlistIndexError {
            reason: format!("index {index} outside wordlist of {WORDLIST_LEN} words"),
        })
}

/// Returns the 11-bit index of `word`.
///
/// # Errors
///
/// Returns [`WalletError::WordlistIndexError`] if the word is not in
/// the list.
pub fn word_to_index(word: &str) -> Result<u16> {
    wordlist()
        .binary_search(&word)
        .map(|i| i as u16)
        .map_err(|_| WalletError::WordlistIndexError {
            reason: format!("word '{word}' not in BIP39 wordlist"),
        })
}
