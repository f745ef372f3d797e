//! Cryptographic core of the sparkvault Bitcoin key engine.
//!
//! This crate is the **sole** location for cryptographic operations.
//! Wallet and CLI crates compose these primitives and never touch hash,
//! curve or cipher implementations directly.
//!
//! # Modules
//!
//! - [`mnemonic`]: BIP39 mnemonic generation, validation, seed derivation
//! - [`wordlist`]: BIP39 English wordlist lookups
//! - [`hd_derive`]: BIP32 secp256k1 hierarchical deterministic keys
//! - [`address`]: P2PKH, P2SH, SegwitV0, Taproot and Spark addresses
//! - [`base58`]: Base58Check encoding
//! - [`bech32`]: Bech32 / Bech32m checksum codec
//! - [`wif`]: Wallet Import Format private keys
//! - [`kdf`]: PBKDF2-HMAC-SHA512 and scrypt password key derivation
//! - [`aead`]: AES-256-GCM authenticated encryption
//! - [`hash`]: SHA-256, hash160, tagged hashes, HMAC-SHA512
//! - [`ct`]: constant-time comparison
//! - [`entropy`]: injectable CSPRNG capability

pub mod address;
pub mod aead;
pub mod base58;
pub mod bech32;
pub mod ct;
pub mod entropy;
pub mod hash;
pub mod hd_derive;
pub mod kdf;
pub mod mnemonic;
pub mod wif;
pub mod wordlist;
