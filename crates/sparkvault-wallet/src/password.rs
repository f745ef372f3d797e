//! Password strength policy applied before sealing a bundle.
//!
//! The policy is a minimum length plus a small deny-list of patterns
//! that offer almost no resistance to guessing:
//!
//! - a single repeated character (`"aaaaaaaaaaaa"`)
//! - ascending or descending digit runs of six or more (`"123456"`,
//!   `"987654"`) and all-digit sequential passwords
//! - `"password"` and `"qwerty"` in any case, including common
//!   leetspeak spellings (`"P@ssw0rd"`)
//!
//! The check only runs when encrypting. Decryption never looks at the
//! password's shape.

use sparkvault_types::config::PASSWORD_MIN_LENGTH_FLOOR;
use sparkvault_types::{Result, WalletError};
use zeroize::Zeroizing;

/// Default minimum password length, in characters.
pub const DEFAULT_MIN_LENGTH: usize = 12;

/// Shortest digit run treated as sequential.
const MIN_SEQUENTIAL_RUN: usize = 6;

/// Words rejected anywhere inside a password once leetspeak is undone.
const DENIED_WORDS: [&str; 2] = ["password", "qwerty"];

/// Minimum length and deny-list checks for new passwords.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PasswordPolicy {
    min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl PasswordPolicy {
    /// Creates a policy with a custom minimum length.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::ConfigError`] if `min_length` is below
    /// [`PASSWORD_MIN_LENGTH_FLOOR`].
    pub fn new(min_length: usize) -> Result<Self> {
        if min_length < PASSWORD_MIN_LENGTH_FLOOR {
            return Err(WalletError::ConfigError {
                reason: format!(
                    "password minimum length must be at least {PASSWORD_MIN_LENGTH_FLOOR}, got {min_length}"
                ),
            });
        }
        Ok(Self { min_length })
    }

    /// Minimum accepted length in characters.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Checks `password` against the policy.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::WeakPasswordError`] naming the first rule
    /// that failed. The reason never echoes the password.
    pub fn check(&self, password: &str) -> Result<()> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(weak(format!(
                "password must be at least {} characters, got {length}",
                self.min_length
            )));
        }

        if is_single_repeated(password) {
            return Err(weak("password repeats a single character".into()));
        }

        if has_sequential_digits(password) {
            return Err(weak("password contains a sequential digit run".into()));
        }

        let folded = fold_leetspeak(password);
        if let Some(word) = DENIED_WORDS.iter().find(|w| folded.contains(*w)) {
            return Err(weak(format!("password contains the common word \"{word}\"")));
        }

        Ok(())
    }
}

fn weak(reason: String) -> WalletError {
    WalletError::WeakPasswordError { reason }
}

fn is_single_repeated(password: &str) -> bool {
    let mut chars = password.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

/// `true` if the password contains a strictly ascending or descending
/// run of at least [`MIN_SEQUENTIAL_RUN`] digits, or consists solely of
/// digits forming such a run.
fn has_sequential_digits(password: &str) -> bool {
    let digits: Vec<Option<i8>> = password
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as i8))
        .collect();

    if digits.len() >= 2 && digits.iter().all(Option::is_some) && is_monotonic_run(&digits) {
        return true;
    }

    digits
        .windows(MIN_SEQUENTIAL_RUN)
        .any(|w| w.iter().all(Option::is_some) && is_monotonic_run(w))
}

fn is_monotonic_run(digits: &[Option<i8>]) -> bool {
    let steps: Vec<i8> = digits
        .windows(2)
        .filter_map(|pair| match (pair[0], pair[1]) {
            (Some(a), Some(b)) => Some(b - a),
            _ => None,
        })
        .collect();
    steps.len() + 1 == digits.len()
        && (steps.iter().all(|&s| s == 1) || steps.iter().all(|&s| s == -1))
}

/// Lowercases and maps common leetspeak substitutions back to letters.
fn fold_leetspeak(password: &str) -> Zeroizing<String> {
    Zeroizing::new(
        password
            .chars()
            .flat_map(char::to_lowercase)
            .map(|c| match c {
                '0' => 'o',
                '1' | '!' => 'i',
                '3' => 'e',
                '4' | '@' => 'a',
                '5' | '$' => 's',
                '7' => 't',
                other => other,
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
