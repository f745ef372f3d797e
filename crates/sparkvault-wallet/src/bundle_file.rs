//! Bundle persistence on disk.
//!
//! A bundle file is the pretty-printed JSON of one [`EncryptedBundle`].
//! Writes go to a uniquely named hidden sibling file first, are synced
//! and then renamed into place, so a crash never leaves a half-written
//! bundle behind and concurrent writers never share a temp file.
//!
//! No plaintext secret material is written to disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use sparkvault_crypto::entropy::{EntropySource, OsEntropy};
use sparkvault_types::{Result, WalletError};

use crate::bundle::EncryptedBundle;

/// Writes `bundle` to `path`, replacing any existing file.
///
/// # Errors
///
/// - [`WalletError::SerializationError`] if the bundle cannot be encoded.
/// - [`WalletError::StorageError`] if the file cannot be written or
///   renamed into place.
pub fn write_bundle(path: &Path, bundle: &EncryptedBundle) -> Result<()> {
    let json = bundle.to_json()?;

    let tmp_path = temp_path(path)?;
    if let Err(e) = write_synced(&tmp_path, json.as_bytes()) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(WalletError::StorageError {
            reason: format!("failed to write bundle file: {e}"),
        });
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        WalletError::StorageError {
            reason: format!("failed to rename bundle file: {e}"),
        }
    })?;

    tracing::info!(path = %path.display(), "bundle saved");
    Ok(())
}

/// `.<name>.<random>.tmp` next to `path`.
fn temp_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| WalletError::StorageError {
            reason: format!("not a file path: {}", path.display()),
        })?
        .to_string_lossy();
    let mut suffix = [0u8; 8];
    OsEntropy.fill_bytes(&mut suffix)?;
    Ok(path.with_file_name(format!(".{name}.{}.tmp", hex::encode(suffix))))
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Reads a bundle from `path`.
///
/// Only the JSON shape is checked here; the vault validates contents
/// when decrypting or inspecting.
///
/// # Errors
///
/// - [`WalletError::StorageError`] if the file is missing or unreadable.
/// - [`WalletError::SerializationError`] if it is not a bundle.
pub fn read_bundle(path: &Path) -> Result<EncryptedBundle> {
    if !path.exists() {
        return Err(WalletError::StorageError {
            reason: format!("bundle file not found: {}", path.display()),
        });
    }

    let json = std::fs::read_to_string(path).map_err(|e| WalletError::StorageError {
        reason: format!("failed to read bundle file: {e}"),
    })?;

    EncryptedBundle::from_json(&json)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::{EncryptOptions, EncryptionVault};

    const PASSWORD: &str = "correct horse battery staple";

    #[test]
    fn write_then_read() -> std::result::Result<(), WalletError> {
        let dir = tempfile::tempdir().map_err(|e| WalletError::StorageError {
            reason: e.to_string(),
        })?;
        let path = dir.path().join("wallet.json");

        let vault = EncryptionVault::with_os_entropy();
        let bundle = vault.encrypt(b"secret", PASSWORD, &EncryptOptions::default())?;
        write_bundle(&path, &bundle)?;

        let leftovers = std::fs::read_dir(dir.path())
            .map_err(|e| WalletError::StorageError {
                reason: e.to_string(),
            })?
            .count();
        assert_eq!(leftovers, 1, "temp file left behind");
        let loaded = read_bundle(&path)?;
        assert_eq!(loaded, bundle);
        assert_eq!(vault.decrypt(&loaded, PASSWORD)?.as_slice(), b"secret");
        Ok(())
    }

    #[test]
    fn file_holds_no_plaintext() -> std::result::Result<(), WalletError> {
        let dir = tempfile::tempdir().map_err(|e| WalletError::StorageError {
            reason: e.to_string(),
        })?;
        let path = dir.path().join("wallet.json");

        let vault = EncryptionVault::with_os_entropy();
        let bundle = vault.encrypt(b"very-recognizable-secret", PASSWORD, &EncryptOptions::default())?;
        write_bundle(&path, &bundle)?;

        let raw = std::fs::read_to_string(&path).map_err(|e| WalletError::StorageError {
            reason: e.to_string(),
        })?;
        assert!(!raw.contains("very-recognizable-secret"));
        assert!(!raw.contains(&hex::encode("very-recognizable-secret")));
        Ok(())
    }

    #[test]
    fn temp_names_are_unique_per_write() -> std::result::Result<(), WalletError> {
        let a = temp_path(Path::new("/tmp/bundle.json"))?;
        let b = temp_path(Path::new("/tmp/bundle.json"))?;
        let other = temp_path(Path::new("/tmp/bundle.txt"))?;
        assert_ne!(a, b);
        assert_ne!(a, other);
        assert_eq!(a.parent(), Some(Path::new("/tmp")));
        Ok(())
    }

    #[test]
    fn overwrite_replaces_existing_bundle() -> std::result::Result<(), WalletError> {
        let dir = tempfile::tempdir().map_err(|e| WalletError::StorageError {
            reason: e.to_string(),
        })?;
        let path = dir.path().join("wallet.json");

        let vault = EncryptionVault::with_os_entropy();
        let first = vault.encrypt(b"one", PASSWORD, &EncryptOptions::default())?;
        let second = vault.encrypt(b"two", PASSWORD, &EncryptOptions::default())?;
        write_bundle(&path, &first)?;
        write_bundle(&path, &second)?;

        assert_eq!(read_bundle(&path)?, second);
        Ok(())
    }

    #[test]
    fn missing_file() {
        let result = read_bundle(Path::new("/nonexistent/sparkvault/bundle.json"));
        assert!(matches!(result, Err(WalletError::StorageError { .. })));
    }

    #[test]
    fn garbage_file() -> std::result::Result<(), WalletError> {
        let dir = tempfile::tempdir().map_err(|e| WalletError::StorageError {
            reason: e.to_string(),
        })?;
        let path = dir.path().join("garbage.json");
        std::fs::write(&path, b"{ not json").map_err(|e| WalletError::StorageError {
            reason: e.to_string(),
        })?;
        assert!(matches!(
            read_bundle(&path),
            Err(WalletError::SerializationError { .. })
        ));
        Ok(())
    }
}
