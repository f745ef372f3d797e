//! Secret input: passwords, passphrases and mnemonics.
//!
//! Secrets come from environment variables when set, so scripts and
//! tests never need a terminal. Otherwise passwords are prompted for
//! without echo and mnemonics are read from stdin.

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use zeroize::Zeroizing;

/// Bundle password.
pub const PASSWORD_ENV: &str = "SPARKVAULT_PASSWORD";

/// Replacement password for `rekey`.
pub const NEW_PASSWORD_ENV: &str = "SPARKVAULT_NEW_PASSWORD";

/// Optional BIP39 passphrase.
pub const PASSPHRASE_ENV: &str = "SPARKVAULT_PASSPHRASE";

/// Reads a password from `env` or prompts for it.
///
/// With `confirm`, the prompt asks twice and fails on a mismatch.
pub fn password(
    env: &str,
    prompt: &str,
    confirm: bool,
) -> std::result::Result<Zeroizing<String>, String> {
    if let Ok(value) = std::env::var(env) {
        return Ok(Zeroizing::new(value));
    }

    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Repeat password", "passwords do not match");
    }
    input
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| format!("failed to read password (or set {env}): {e}"))
}

/// BIP39 passphrase from the environment, empty when unset.
pub fn passphrase() -> Zeroizing<String> {
    Zeroizing::new(std::env::var(PASSPHRASE_ENV).unwrap_or_default())
}

/// Uses `arg` or reads the first non-empty line from stdin.
pub async fn mnemonic(arg: Option<String>) -> std::result::Result<Zeroizing<String>, String> {
    if let Some(phrase) = arg {
        return Ok(Zeroizing::new(phrase));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => return Ok(Zeroizing::new(line)),
            Ok(None) => return Err("no mnemonic given on the command line or stdin".into()),
            Err(e) => return Err(format!("failed to read mnemonic: {e}")),
        }
    }
}

/// Reads all of stdin.
pub async fn stdin_bytes() -> std::result::Result<Zeroizing<Vec<u8>>, String> {
    let mut buf = Zeroizing::new(Vec::new());
    tokio::io::stdin()
        .read_to_end(&mut buf)
        .await
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    Ok(buf)
}
