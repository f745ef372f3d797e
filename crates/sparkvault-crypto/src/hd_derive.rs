//! BIP32 secp256k1 hierarchical deterministic key derivation.
//!
//! Derives a tree of private keys from a BIP39 seed. Both hardened and
//! normal children are supported:
//!
//! ```text
//! hardened:  I = HMAC-SHA512(c_par, 0x00 || k_par || ser32(i | 0x80000000))
//! normal:    I = HMAC-SHA512(c_par, serP(K_par) || ser32(i))
//! child:     k_i = (IL + k_par) mod n,  c_i = IR
//! ```
//!
//! Scalar addition and public key computation use the `k256` curve
//! arithmetic. When `IL >= n` or the child key is zero the derivation
//! fails with [`WalletError::InvalidChildKey`]; no substitute key is
//! ever produced, and the caller decides whether to move on to the next
//! index.
//!
//! Reference: <https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki>

use std::fmt;
use std::str::FromStr;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::{Field, PrimeField};
use k256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar};
use sparkvault_types::{Network, Result, WalletError};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::base58;
use crate::hash::{hash160, hmac_sha512};
use crate::mnemonic::Seed;

/// The hardened index offset (0x80000000) per BIP32.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for master key generation per BIP32.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Length of a serialized extended key before the Base58Check checksum.
const XKEY_LEN: usize = 78;

// ---------------------------------------------------------------------------
// ChildIndex
// ---------------------------------------------------------------------------

/// One step of a derivation path: a 31-bit index plus hardened flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ChildIndex {
    index: u32,
    hardened: bool,
}

impl ChildIndex {
    /// Creates a hardened index.
    pub fn hardened(index: u32) -> Result<Self> {
        Self::new(index, true)
    }

    /// Creates a normal (non-hardened) index.
    pub fn normal(index: u32) -> Result<Self> {
        Self::new(index, false)
    }

    /// Creates an index, rejecting values that do not fit in 31 bits.
    pub fn new(index: u32, hardened: bool) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(WalletError::InvalidDerivationPath {
                reason: format!("child index {index} exceeds 2^31 - 1"),
            });
        }
        Ok(Self { index, hardened })
    }

    /// Splits a raw `ser32` child number back into index and flag.
    pub fn from_raw(raw: u32) -> Self {
        Self {
            index: raw & !HARDENED_OFFSET,
            hardened: raw & HARDENED_OFFSET != 0,
        }
    }

    /// The 31-bit index without the hardened bit.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Whether this step uses hardened derivation.
    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// The raw child number as serialized by BIP32.
    pub fn to_raw(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

// ---------------------------------------------------------------------------
// DerivationPath
// ---------------------------------------------------------------------------

/// An ordered list of child indices, e.g. `m/84'/0'/0'/0/0`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// Creates a path from explicit steps.
    pub fn new(steps: Vec<ChildIndex>) -> Self {
        Self(steps)
    }

    /// The path's steps, root first.
    pub fn steps(&self) -> &[ChildIndex] {
        &self.0
    }

    /// Returns a new path with `step` appended.
    pub fn child(&self, step: ChildIndex) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    /// Parses `m`, `m/44'/0'/0'/0/0`, accepting `'`, `h` or `H` as the
    /// hardened marker.
    fn from_str(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        let mut parts = trimmed.split('/');

        if parts.next() != Some("m") {
            return Err(WalletError::InvalidDerivationPath {
                reason: format!("derivation path must start with 'm', got '{trimmed}'"),
            });
        }

        let mut steps = Vec::new();
        for part in parts {
            if part.is_empty() {
                return Err(WalletError::InvalidDerivationPath {
                    reason: "empty component in derivation path".into(),
                });
            }

            let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
                Some(stripped) => (stripped, true),
                None => (part, false),
            };

            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(WalletError::InvalidDerivationPath {
                    reason: format!("invalid path component '{part}'"),
                });
            }

            let index: u32 = digits.parse().map_err(|_| WalletError::InvalidDerivationPath {
                reason: format!("path component '{part}' out of range"),
            })?;

            steps.push(ChildIndex::new(index, hardened)?);
        }

        Ok(Self(steps))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for step in &self.0 {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

/// Builds a BIP44-style path `m/purpose'/coin'/account'/change/index`.
///
/// Purposes used by the wallet: 44 (P2PKH), 49 (P2SH-P2WPKH),
/// 84 (SegwitV0) and 86 (Taproot).
pub fn bip_path(
    purpose: u32,
    coin_type: u32,
    account: u32,
    change: u32,
    index: u32,
) -> Result<DerivationPath> {
    Ok(DerivationPath(vec![
        ChildIndex::hardened(purpose)?,
        ChildIndex::hardened(coin_type)?,
        ChildIndex::hardened(account)?,
        ChildIndex::normal(change)?,
        ChildIndex::normal(index)?,
    ]))
}

// ---------------------------------------------------------------------------
// ExtendedPrivateKey
// ---------------------------------------------------------------------------

/// A BIP32 extended private key: key, chain code and tree position.
///
/// Key material is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ExtendedPrivateKey {
    private_key: [u8; 32],
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
}

// ExtendedPrivateKey does not implement Clone/Debug to prevent leakage.

impl ExtendedPrivateKey {
    /// Generates the master key from a seed.
    ///
    /// `I = HMAC-SHA512(key="Bitcoin seed", data=seed)`; `IL` is the
    /// master private key and `IR` the chain code.
    ///
    /// # Errors
    ///
    /// [`WalletError::InvalidChildKey`] (index 0) if `IL` is zero or not
    /// below the curve order; BIP32 declares such a seed unusable.
    pub fn master_from_seed(seed: &Seed) -> Result<Self> {
        Self::master_from_bytes(seed.as_bytes())
    }

    /// Master key generation over arbitrary seed bytes (16..=64 bytes),
    /// as used by the BIP32 reference vectors.
    pub fn master_from_bytes(seed: &[u8]) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(WalletError::InvalidKey {
                reason: format!("seed must be 16..=64 bytes, got {}", seed.len()),
            });
        }

        let mut i = hmac_sha512(MASTER_HMAC_KEY, seed)?;
        let (mut private_key, chain_code) = split(&i);
        i.zeroize();
        if parse_scalar(&private_key).is_err() {
            private_key.zeroize();
            return Err(WalletError::InvalidChildKey { index: 0 });
        }

        Ok(Self {
            private_key,
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: 0,
        })
    }

    /// Derives the child at `index`.
    ///
    /// # Errors
    ///
    /// - [`WalletError::InvalidChildKey`] if `IL >= n` or the resulting
    ///   key is zero.
    /// - [`WalletError::InvalidDerivationPath`] if `index` does not fit in
    ///   31 bits or the tree is already 255 levels deep.
    pub fn derive_child(&self, index: u32, hardened: bool) -> Result<Self> {
        let step = ChildIndex::new(index, hardened)?;
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| WalletError::InvalidDerivationPath {
                reason: "maximum derivation depth (255) exceeded".into(),
            })?;

        let mut data = [0u8; 37];
        if hardened {
            data[1..33].copy_from_slice(&self.private_key);
        } else {
            data[..33].copy_from_slice(&self.public_key()?);
        }
        data[33..].copy_from_slice(&step.to_raw().to_be_bytes());

        let mut i = hmac_sha512(&self.chain_code, &data)?;
        data.zeroize();

        let (mut tweak, chain_code) = split(&i);
        i.zeroize();
        let sum = add_scalars(&tweak, &self.private_key, index);
        tweak.zeroize();
        let private_key = sum?;

        Ok(Self {
            private_key,
            chain_code,
            depth,
            parent_fingerprint: self.fingerprint()?,
            child_number: step.to_raw(),
        })
    }

    /// Folds [`derive_child`](Self::derive_child) over every step of `path`.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut steps = path.steps().iter();
        let Some(first) = steps.next() else {
            return Ok(self.duplicate());
        };
        let mut key = self.derive_child(first.index(), first.is_hardened())?;
        for step in steps {
            key = key.derive_child(step.index(), step.is_hardened())?;
        }
        Ok(key)
    }

    /// Returns the raw 32-byte private key.
    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    /// Returns the 32-byte chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Depth in the tree (0 for the master key).
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Fingerprint of the parent key (zero for the master key).
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Raw `ser32` child number, hardened bit included.
    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// The 33-byte compressed SEC1 public key.
    pub fn public_key(&self) -> Result<[u8; 33]> {
        public_key_from_private(&self.private_key)
    }

    /// First 4 bytes of `hash160(public_key)`.
    pub fn fingerprint(&self) -> Result<[u8; 4]> {
        let id = hash160(&self.public_key()?);
        Ok([id[0], id[1], id[2], id[3]])
    }

    /// Serializes as `xprv` (mainnet) or `tprv` (testnet).
    pub fn to_xprv(&self, network: Network) -> String {
        let mut key_data = [0u8; 33];
        key_data[1..].copy_from_slice(&self.private_key);
        let mut payload = self.serialize(network.xprv_version(), &key_data);
        let encoded = base58::encode_check(&payload);
        payload.zeroize();
        key_data.zeroize();
        encoded
    }

    /// Serializes the matching public key as `xpub` / `tpub`.
    pub fn to_xpub(&self, network: Network) -> Result<String> {
        let payload = self.serialize(network.xpub_version(), &self.public_key()?);
        Ok(base58::encode_check(&payload))
    }

    /// Parses an `xprv` / `tprv` string.
    ///
    /// # Errors
    ///
    /// - [`WalletError::Base58ChecksumError`] for bad encoding or checksum.
    /// - [`WalletError::InvalidKey`] for a wrong length, unknown version,
    ///   missing `0x00` key prefix or an out-of-range private key.
    pub fn from_xprv(s: &str) -> Result<(Self, Network)> {
        let mut data = base58::decode_check(s)?;
        let parsed = Self::deserialize(&data);
        data.zeroize();
        parsed
    }

    fn deserialize(data: &[u8]) -> Result<(Self, Network)> {
        if data.len() != XKEY_LEN {
            return Err(WalletError::InvalidKey {
                reason: format!("extended key must be {XKEY_LEN} bytes, got {}", data.len()),
            });
        }

        let version = &data[..4];
        let network = if version == Network::Mainnet.xprv_version() {
            Network::Mainnet
        } else if version == Network::Testnet.xprv_version() {
            Network::Testnet
        } else {
            return Err(WalletError::InvalidKey {
                reason: "unknown extended private key version".into(),
            });
        };

        if data[45] != 0x00 {
            return Err(WalletError::InvalidKey {
                reason: "extended private key data must start with 0x00".into(),
            });
        }

        let mut private_key = [0u8; 32];
        private_key.copy_from_slice(&data[46..78]);
        if let Err(e) = parse_scalar(&private_key) {
            private_key.zeroize();
            return Err(e);
        }

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let child_number = u32::from_be_bytes([data[9], data[10], data[11], data[12]]);
        let depth = data[4];

        // A master key has no parent and no index.
        if depth == 0 && (parent_fingerprint != [0u8; 4] || child_number != 0) {
            private_key.zeroize();
            chain_code.zeroize();
            return Err(WalletError::InvalidKey {
                reason: "depth-0 key must have zero parent fingerprint and child number".into(),
            });
        }

        Ok((
            Self {
                private_key,
                chain_code,
                depth,
                parent_fingerprint,
                child_number,
            },
            network,
        ))
    }

    fn serialize(&self, version: [u8; 4], key_data: &[u8; 33]) -> Vec<u8> {
        let mut out = Vec::with_capacity(XKEY_LEN);
        out.extend_from_slice(&version);
        out.push(self.depth);
        out.extend_from_slice(&self.parent_fingerprint);
        out.extend_from_slice(&self.child_number.to_be_bytes());
        out.extend_from_slice(&self.chain_code);
        out.extend_from_slice(key_data);
        out
    }

    fn duplicate(&self) -> Self {
        Self {
            private_key: self.private_key,
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
        }
    }
}

/// Derives the key at `path` starting from the seed's master key.
pub fn derive_path(seed: &Seed, path: &DerivationPath) -> Result<ExtendedPrivateKey> {
    ExtendedPrivateKey::master_from_seed(seed)?.derive_path(path)
}

/// Computes the compressed SEC1 public key for a raw private key.
///
/// # Errors
///
/// [`WalletError::InvalidKey`] if the key is zero or not below the
/// curve order.
pub fn public_key_from_private(private_key: &[u8; 32]) -> Result<[u8; 33]> {
    let scalar = parse_scalar(private_key)?;
    let point = AffinePoint::from(ProjectivePoint::GENERATOR * scalar);
    let encoded = point.to_encoded_point(true);

    let mut out = [0u8; 33];
    out.copy_from_slice(encoded.as_bytes());
    Ok(out)
}

// ---------------------------------------------------------------------------
// Internal: scalar arithmetic
// ---------------------------------------------------------------------------

/// Parses a non-zero scalar below the curve order.
pub(crate) fn parse_scalar(bytes: &[u8; 32]) -> Result<Scalar> {
    let scalar: Option<Scalar> = Scalar::from_repr(*FieldBytes::from_slice(bytes)).into();
    match scalar {
        Some(s) if !bool::from(s.is_zero()) => Ok(s),
        _ => Err(WalletError::InvalidKey {
            reason: "private key is zero or not below the secp256k1 order".into(),
        }),
    }
}

/// Splits an HMAC-SHA512 output into `(IL, IR)`.
fn split(i: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&i[..32]);
    right.copy_from_slice(&i[32..]);
    (left, right)
}

/// Computes `(tweak + key) mod n`, rejecting a zero result.
fn add_scalars(tweak: &[u8; 32], key: &[u8; 32], index: u32) -> Result<[u8; 32]> {
    let tweak: Option<Scalar> = Scalar::from_repr(*FieldBytes::from_slice(tweak)).into();
    let tweak = tweak.ok_or(WalletError::InvalidChildKey { index })?;
    let parent = parse_scalar(key)?;

    let child = tweak + parent;
    if bool::from(child.is_zero()) {
        return Err(WalletError::InvalidChildKey { index });
    }

    let mut out = [0u8; 32];
    out.copy_from_slice(&child.to_repr());
    Ok(out)
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

    /// BIP32 test vector 1 seed.
    const TV1_SEED: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
        0x0e, 0x0f,
    ];

    #[test]
    fn tv1_master() -> std::result::Result<(), WalletError> {
        let master = ExtendedPrivateKey::master_from_bytes(&TV1_SEED)?;
        assert_eq!(
            to_hex(master.private_key()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            to_hex(master.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
        assert_eq!(
            master.to_xprv(Network::Mainnet),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            master.to_xpub(Network::Mainnet)?,
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
        );
        Ok(())
    }

    #[test]
    fn tv1_hardened_then_normal() -> std::result::Result<(), WalletError> {
        let master = ExtendedPrivateKey::master_from_bytes(&TV1_SEED)?;

        let m0h = master.derive_child(0, true)?;
        assert_eq!(
            to_hex(m0h.private_key()),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(m0h.depth(), 1);
        assert_eq!(m0h.child_number(), 0x8000_0000);
        assert_eq!(m0h.parent_fingerprint(), master.fingerprint()?);

        let m0h1 = m0h.derive_child(1, false)?;
        assert_eq!(
            to_hex(m0h1.private_key()),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );

        let via_path = master.derive_path(&"m/0'/1".parse()?)?;
        assert_eq!(via_path.private_key(), m0h1.private_key());
        Ok(())
    }

    #[test]
    fn master_fingerprint_tv1() -> std::result::Result<(), WalletError> {
        let master = ExtendedPrivateKey::master_from_bytes(&TV1_SEED)?;
        assert_eq!(to_hex(&master.fingerprint()?), "3442193e");
        Ok(())
    }

    #[test]
    fn xprv_roundtrip() -> std::result::Result<(), WalletError> {
        let master = ExtendedPrivateKey::master_from_bytes(&TV1_SEED)?;
        let child = master.derive_child(7, true)?;
        let encoded = child.to_xprv(Network::Testnet);
        assert!(encoded.starts_with("tprv"));

        let (parsed, network) = ExtendedPrivateKey::from_xprv(&encoded)?;
        assert_eq!(network, Network::Testnet);
        assert_eq!(parsed.private_key(), child.private_key());
        assert_eq!(parsed.chain_code(), child.chain_code());
        assert_eq!(parsed.depth(), 1);
        assert_eq!(parsed.child_number(), 7 | HARDENED_OFFSET);
        Ok(())
    }

    #[test]
    fn xpub_is_not_accepted_as_xprv() -> std::result::Result<(), WalletError> {
        let master = ExtendedPrivateKey::master_from_bytes(&TV1_SEED)?;
        let xpub = master.to_xpub(Network::Mainnet)?;
        assert!(matches!(
            ExtendedPrivateKey::from_xprv(&xpub),
            Err(WalletError::InvalidKey { .. })
        ));
        Ok(())
    }

    #[test]
    fn depth_zero_key_must_look_like_a_master() -> std::result::Result<(), WalletError> {
        let master = ExtendedPrivateKey::master_from_bytes(&TV1_SEED)?;

        let mut with_parent = master.duplicate();
        with_parent.parent_fingerprint = [0x01, 0x02, 0x03, 0x04];
        assert!(matches!(
            ExtendedPrivateKey::from_xprv(&with_parent.to_xprv(Network::Mainnet)),
            Err(WalletError::InvalidKey { .. })
        ));

        let mut with_index = master.duplicate();
        with_index.child_number = 1;
        assert!(matches!(
            ExtendedPrivateKey::from_xprv(&with_index.to_xprv(Network::Mainnet)),
            Err(WalletError::InvalidKey { .. })
        ));

        let (parsed, _) = ExtendedPrivateKey::from_xprv(&master.to_xprv(Network::Mainnet))?;
        assert_eq!(parsed.depth(), 0);
        Ok(())
    }

    #[test]
    fn empty_path_returns_same_key() -> std::result::Result<(), WalletError> {
        let master = ExtendedPrivateKey::master_from_bytes(&TV1_SEED)?;
        let same = master.derive_path(&"m".parse()?)?;
        assert_eq!(same.private_key(), master.private_key());
        Ok(())
    }

    #[test]
    fn add_scalars_rejects_zero_sum() -> std::result::Result<(), WalletError> {
        // key = 1, tweak = n - 1  =>  sum = 0 mod n
        let mut one = [0u8; 32];
        one[31] = 1;
        let minus_one = -Scalar::ONE;
        let mut tweak = [0u8; 32];
        tweak.copy_from_slice(&minus_one.to_repr());

        assert!(matches!(
            add_scalars(&tweak, &one, 9),
            Err(WalletError::InvalidChildKey { index: 9 })
        ));
        Ok(())
    }

    #[test]
    fn add_scalars_rejects_tweak_above_order() {
        let mut one = [0u8; 32];
        one[31] = 1;
        assert!(matches!(
            add_scalars(&[0xFF; 32], &one, 3),
            Err(WalletError::InvalidChildKey { index: 3 })
        ));
    }

    #[test]
    fn path_parse_and_display() -> std::result::Result<(), WalletError> {
        let path: DerivationPath = "m/84h/0H/0'/0/5".parse()?;
        assert_eq!(path.to_string(), "m/84'/0'/0'/0/5");
        assert_eq!(path.steps().len(), 5);
        assert!(path.steps()[0].is_hardened());
        assert!(!path.steps()[4].is_hardened());
        assert_eq!(path.steps()[4].index(), 5);
        Ok(())
    }

    #[test]
    fn path_parse_rejects_garbage() {
        for bad in ["", "44'/0'", "m/", "m//1", "m/x", "m/-1", "m/2147483648", "m/1''"] {
            assert!(
                bad.parse::<DerivationPath>().is_err(),
                "path {bad:?} accepted"
            );
        }
    }

    #[test]
    fn bip_path_layout() -> std::result::Result<(), WalletError> {
        let path = bip_path(86, 1, 0, 0, 3)?;
        assert_eq!(path.to_string(), "m/86'/1'/0'/0/3");
        Ok(())
    }

    #[test]
    fn seed_length_checked() {
        assert!(ExtendedPrivateKey::master_from_bytes(&[0u8; 15]).is_err());
        assert!(ExtendedPrivateKey::master_from_bytes(&[0u8; 65]).is_err());
    }
}
