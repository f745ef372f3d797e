//! Wallet-level operations for the sparkvault key engine.
//!
//! - **Engine**: generate or import a wallet and export its addresses,
//!   public keys and WIF keys for every supported scheme
//! - **Vault**: password-based AES-256-GCM encryption of arbitrary
//!   payloads into a versioned [`bundle::EncryptedBundle`]
//! - **Password policy** applied before anything is sealed
//! - **Background** execution of the CPU-heavy paths on Tokio's
//!   blocking pool
//! - **Bundle files** written atomically to disk

pub mod background;
pub mod bundle;
pub mod bundle_file;
pub mod engine;
pub mod password;
pub mod vault;
