//! Address encoding for every supported scheme.
//!
//! | Kind       | Encoding    | Payload                                  |
//! |------------|-------------|------------------------------------------|
//! | `P2pkh`    | Base58Check | `hash160(pubkey)`                        |
//! | `P2sh`     | Base58Check | `hash160(0x00 0x14 || hash160(pubkey))`  |
//! | `SegwitV0` | Bech32      | witness v0, `hash160(pubkey)`            |
//! | `Taproot`  | Bech32m     | witness v1, BIP341 tweaked x-only key    |
//! | `Spark`    | Bech32m     | see [`spark`]                            |
//!
//! The wallet's P2SH address is nested segwit (BIP49); the raw form is
//! available through [`p2sh_from_script_hash`].

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, ProjectivePoint, PublicKey, Scalar};
use sparkvault_types::{AddressKind, Network, Result, WalletError};

use crate::base58;
use crate::bech32::{self, Variant};
use crate::hash::{hash160, tagged_hash};

pub use spark::SparkScheme;

/// Length of a compressed SEC1 public key.
pub const PUBKEY_LEN: usize = 33;

/// Highest witness version defined by BIP141.
const MAX_WITNESS_VERSION: u8 = 16;

// ---------------------------------------------------------------------------
// Legacy Base58Check
// ---------------------------------------------------------------------------

/// Pay-to-pubkey-hash address (`1…` mainnet, `m…`/`n…` testnet).
pub fn p2pkh(pubkey: &[u8; PUBKEY_LEN], network: Network) -> String {
    base58::check_encode(network.p2pkh_version(), &hash160(pubkey))
}

/// Pay-to-script-hash address for an arbitrary 20-byte script hash.
pub fn p2sh_from_script_hash(script_hash: &[u8; 20], network: Network) -> String {
    base58::check_encode(network.p2sh_version(), script_hash)
}

/// P2SH-wrapped P2WPKH address (`3…` mainnet, `2…` testnet).
pub fn p2sh_p2wpkh(pubkey: &[u8; PUBKEY_LEN], network: Network) -> String {
    let mut redeem_script = [0u8; 22];
    redeem_script[0] = 0x00;
    redeem_script[1] = 0x14;
    redeem_script[2..].copy_from_slice(&hash160(pubkey));
    p2sh_from_script_hash(&hash160(&redeem_script), network)
}

// ---------------------------------------------------------------------------
// Segwit
// ---------------------------------------------------------------------------

/// Native segwit v0 key-hash address (`bc1q…`).
pub fn segwit_v0(pubkey: &[u8; PUBKEY_LEN], network: Network) -> Result<String> {
    encode_segwit(network.segwit_hrp(), 0, &hash160(pubkey))
}

/// Taproot key-path address with no script tree (`bc1p…`).
pub fn taproot(pubkey: &[u8; PUBKEY_LEN], network: Network) -> Result<String> {
    encode_segwit(network.segwit_hrp(), 1, &taproot_output_key(pubkey)?)
}

/// BIP341/BIP86 output key: `x(P + int(tagged_hash("TapTweak", x(P)))·G)`.
///
/// `P` is the even-Y point sharing the internal key's x coordinate.
///
/// # Errors
///
/// [`WalletError::InvalidKey`] if `pubkey` is not a valid point, the
/// tweak is not below the curve order, or the output is the identity.
pub fn taproot_output_key(pubkey: &[u8; PUBKEY_LEN]) -> Result<[u8; 32]> {
    let internal = PublicKey::from_sec1_bytes(pubkey).map_err(|e| WalletError::InvalidKey {
        reason: format!("invalid public key: {e}"),
    })?;
    let encoded = internal.to_encoded_point(true);
    let x = encoded.x().ok_or_else(|| WalletError::InvalidKey {
        reason: "public key is the identity point".into(),
    })?;

    let mut even = [0u8; PUBKEY_LEN];
    even[0] = 0x02;
    even[1..].copy_from_slice(x);
    let lifted = PublicKey::from_sec1_bytes(&even).map_err(|e| WalletError::InvalidKey {
        reason: format!("x-only lift failed: {e}"),
    })?;

    let tweak = tagged_hash("TapTweak", x);
    let tweak: Option<Scalar> = Scalar::from_repr(*FieldBytes::from_slice(&tweak)).into();
    let tweak = tweak.ok_or_else(|| WalletError::InvalidKey {
        reason: "taproot tweak exceeds curve order".into(),
    })?;

    let output = AffinePoint::from(lifted.to_projective() + ProjectivePoint::GENERATOR * tweak);
    let output = output.to_encoded_point(true);
    let qx = output.x().ok_or_else(|| WalletError::InvalidKey {
        reason: "tweaked key is the identity point".into(),
    })?;

    let mut out = [0u8; 32];
    out.copy_from_slice(qx);
    Ok(out)
}

/// Encodes a witness program under `hrp`.
///
/// Version 0 uses Bech32, versions 1..=16 use Bech32m.
pub fn encode_segwit(hrp: &str, version: u8, program: &[u8]) -> Result<String> {
    check_witness_program(version, program)?;
    let mut data = vec![version];
    data.extend(bech32::convert_bits(program, 8, 5, true)?);
    bech32::encode(hrp, &data, segwit_variant(version))
}

/// Decodes a segwit address into `(network, version, program)`.
///
/// # Errors
///
/// - [`WalletError::Bech32ChecksumError`] for codec failures or when the
///   checksum variant does not match the witness version.
/// - [`WalletError::InvalidAddress`] for an unknown HRP, a version above
///   16, or a program length outside the allowed range.
pub fn decode_segwit(s: &str) -> Result<(Network, u8, Vec<u8>)> {
    let (hrp, data, variant) = bech32::decode(s)?;
    let network = Network::from_segwit_hrp(&hrp).ok_or_else(|| WalletError::InvalidAddress {
        reason: format!("unknown segwit HRP '{hrp}'"),
    })?;

    let (&version, rest) = data.split_first().ok_or_else(|| WalletError::InvalidAddress {
        reason: "missing witness version".into(),
    })?;
    if version > MAX_WITNESS_VERSION {
        return Err(WalletError::InvalidAddress {
            reason: format!("witness version {version} above {MAX_WITNESS_VERSION}"),
        });
    }
    if variant != segwit_variant(version) {
        return Err(WalletError::Bech32ChecksumError {
            reason: format!("witness version {version} requires {:?}", segwit_variant(version)),
        });
    }

    let program = bech32::convert_bits(rest, 5, 8, false)?;
    check_witness_program(version, &program)?;
    Ok((network, version, program))
}

/// Decodes a segwit address and requires it to belong to `network`.
pub fn decode_segwit_for(s: &str, network: Network) -> Result<(u8, Vec<u8>)> {
    let (found, version, program) = decode_segwit(s)?;
    if found != network {
        return Err(WalletError::InvalidAddress {
            reason: format!("address is for {found}, expected {network}"),
        });
    }
    Ok((version, program))
}

fn segwit_variant(version: u8) -> Variant {
    if version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    }
}

fn check_witness_program(version: u8, program: &[u8]) -> Result<()> {
    if version > MAX_WITNESS_VERSION {
        return Err(WalletError::InvalidAddress {
            reason: format!("witness version {version} above {MAX_WITNESS_VERSION}"),
        });
    }
    if !(2..=40).contains(&program.len()) {
        return Err(WalletError::InvalidAddress {
            reason: format!("witness program length {} outside 2..=40", program.len()),
        });
    }
    if version == 0 && program.len() != 20 && program.len() != 32 {
        return Err(WalletError::InvalidAddress {
            reason: format!("v0 witness program must be 20 or 32 bytes, got {}", program.len()),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Spark
// ---------------------------------------------------------------------------

/// Spark layer-2 addresses.
///
/// Spark is an application-defined scheme that only borrows the Bech32m
/// checksum from Bitcoin. An address is
/// `bech32m(hrp, [version] || to5bit(tagged_hash("SparkAddress/v<version>", pubkey33)))`.
/// The HRP and version come from [`SparkScheme`] so the scheme can be
/// versioned without touching Bitcoin address code.
pub mod spark {
    use sparkvault_types::config::EngineConfig;
    use sparkvault_types::{Result, WalletError};

    use super::PUBKEY_LEN;
    use crate::bech32::{self, Variant};
    use crate::hash::tagged_hash;

    /// Default human-readable part.
    pub const DEFAULT_HRP: &str = "sp";

    /// Default scheme version.
    pub const DEFAULT_VERSION: u8 = 0;

    /// Default BIP43 purpose for Spark identity keys.
    pub const DEFAULT_PURPOSE: u32 = 8_797_555;

    /// Configurable Spark scheme parameters.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct SparkScheme {
        /// Human-readable part, lowercase.
        pub hrp: String,
        /// Version encoded as the first data symbol (0..=31).
        pub version: u8,
        /// Hardened purpose of the derivation path.
        pub purpose: u32,
    }

    impl Default for SparkScheme {
        fn default() -> Self {
            Self {
                hrp: DEFAULT_HRP.into(),
                version: DEFAULT_VERSION,
                purpose: DEFAULT_PURPOSE,
            }
        }
    }

    impl SparkScheme {
        /// Takes the Spark fields from an engine configuration.
        pub fn from_config(config: &EngineConfig) -> Self {
            Self {
                hrp: config.spark_hrp.clone(),
                version: config.spark_version,
                purpose: config.spark_purpose,
            }
        }

        fn tag(&self) -> String {
            format!("SparkAddress/v{}", self.version)
        }
    }

    /// Encodes a Spark address for a compressed public key.
    pub fn encode(pubkey: &[u8; PUBKEY_LEN], scheme: &SparkScheme) -> Result<String> {
        if scheme.version > 31 {
            return Err(WalletError::UnsupportedAddressScheme {
                reason: format!("spark version {} does not fit a bech32 symbol", scheme.version),
            });
        }
        let payload = tagged_hash(&scheme.tag(), pubkey);
        let mut data = vec![scheme.version];
        data.extend(bech32::convert_bits(&payload, 8, 5, true)?);
        bech32::encode(&scheme.hrp, &data, Variant::Bech32m)
    }

    /// Decodes a Spark address and returns its 32-byte key commitment.
    ///
    /// # Errors
    ///
    /// - [`WalletError::Bech32ChecksumError`] for codec failures or a
    ///   Bech32 (not Bech32m) checksum.
    /// - [`WalletError::UnsupportedAddressScheme`] for a foreign HRP or
    ///   an unknown version.
    /// - [`WalletError::InvalidAddress`] for a payload that is not 32 bytes.
    pub fn decode(s: &str, scheme: &SparkScheme) -> Result<[u8; 32]> {
        let (hrp, data, variant) = bech32::decode(s)?;
        if hrp != scheme.hrp {
            return Err(WalletError::UnsupportedAddressScheme {
                reason: format!("HRP '{hrp}' is not a spark HRP"),
            });
        }
        if variant != Variant::Bech32m {
            return Err(WalletError::Bech32ChecksumError {
                reason: "spark addresses use bech32m".into(),
            });
        }
        let (&version, rest) = data.split_first().ok_or_else(|| WalletError::InvalidAddress {
            reason: "missing spark version".into(),
        })?;
        if version != scheme.version {
            return Err(WalletError::UnsupportedAddressScheme {
                reason: format!("spark version {version} is not supported"),
            });
        }
        let payload = bech32::convert_bits(rest, 5, 8, false)?;
        let payload: [u8; 32] =
            payload
                .as_slice()
                .try_into()
                .map_err(|_| WalletError::InvalidAddress {
                    reason: format!("spark payload must be 32 bytes, got {}", payload.len()),
                })?;
        Ok(payload)
    }

    /// Whether `s` decodes as a Spark address committing to `pubkey`.
    pub fn matches(s: &str, pubkey: &[u8; PUBKEY_LEN], scheme: &SparkScheme) -> bool {
        match decode(s, scheme) {
            Ok(payload) => crate::ct::constant_time_eq(&payload, &tagged_hash(&scheme.tag(), pubkey)),
            Err(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Result of [`decode_address`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedAddress {
    /// Detected scheme.
    pub kind: AddressKind,
    /// Bitcoin network; `None` for Spark addresses.
    pub network: Option<Network>,
    /// Hash, witness program or Spark key commitment.
    pub program: Vec<u8>,
}

/// Encodes `pubkey` under the given scheme.
pub fn encode_address(
    kind: AddressKind,
    pubkey: &[u8; PUBKEY_LEN],
    network: Network,
    scheme: &SparkScheme,
) -> Result<String> {
    match kind {
        AddressKind::P2pkh => Ok(p2pkh(pubkey, network)),
        AddressKind::P2sh => Ok(p2sh_p2wpkh(pubkey, network)),
        AddressKind::SegwitV0 => segwit_v0(pubkey, network),
        AddressKind::Taproot => taproot(pubkey, network),
        AddressKind::Spark => spark::encode(pubkey, scheme),
    }
}

/// Recognizes and decodes any supported address.
///
/// # Errors
///
/// - [`WalletError::UnsupportedAddressScheme`] when the string matches
///   no scheme (including valid but unsupported witness programs).
/// - Codec errors of the matching scheme otherwise.
pub fn decode_address(s: &str, scheme: &SparkScheme) -> Result<DecodedAddress> {
    let lower = s.to_ascii_lowercase();

    if lower.starts_with(&format!("{}1", scheme.hrp)) {
        let program = spark::decode(s, scheme)?;
        return Ok(DecodedAddress {
            kind: AddressKind::Spark,
            network: None,
            program: program.to_vec(),
        });
    }

    if lower.starts_with("bc1") || lower.starts_with("tb1") {
        let (network, version, program) = decode_segwit(s)?;
        let kind = match (version, program.len()) {
            (0, 20) => AddressKind::SegwitV0,
            (1, 32) => AddressKind::Taproot,
            _ => {
                return Err(WalletError::UnsupportedAddressScheme {
                    reason: format!(
                        "witness v{version} program of {} bytes is not supported",
                        program.len()
                    ),
                })
            }
        };
        return Ok(DecodedAddress {
            kind,
            network: Some(network),
            program,
        });
    }

    if !s.is_empty() && s.bytes().all(is_base58_char) {
        let (version, payload) = base58::check_decode(s)?;
        let (kind, network) = match version {
            0x00 => (AddressKind::P2pkh, Network::Mainnet),
            0x6f => (AddressKind::P2pkh, Network::Testnet),
            0x05 => (AddressKind::P2sh, Network::Mainnet),
            0xc4 => (AddressKind::P2sh, Network::Testnet),
            other => {
                return Err(WalletError::UnsupportedAddressScheme {
                    reason: format!("base58 version byte 0x{other:02x} is not an address"),
                })
            }
        };
        if payload.len() != 20 {
            return Err(WalletError::InvalidAddress {
                reason: format!("base58 address payload must be 20 bytes, got {}", payload.len()),
            });
        }
        return Ok(DecodedAddress {
            kind,
            network: Some(network),
            program: payload,
        });
    }

    Err(WalletError::UnsupportedAddressScheme {
        reason: "string matches no supported address scheme".into(),
    })
}

fn is_base58_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, b'0' | b'O' | b'I' | b'l')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn from_hex<const N: usize>(s: &str) -> [u8; N] {
        let mut out = [0u8; N];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[2 * i..2 * i + 2], 16).unwrap_or(0);
        }
        out
    }

    /// Compressed generator point (private key 1).
    fn generator_pubkey() -> [u8; 33] {
        from_hex("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
    }

    #[test]
    fn p2pkh_generator_key() {
        assert_eq!(
            p2pkh(&generator_pubkey(), Network::Mainnet),
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
    }

    #[test]
    fn segwit_v0_bip173_vector() -> std::result::Result<(), WalletError> {
        let addr = segwit_v0(&generator_pubkey(), Network::Mainnet)?;
        assert_eq!(addr, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
        let (version, program) = decode_segwit_for(&addr, Network::Mainnet)?;
        assert_eq!(version, 0);
        assert_eq!(program, hash160(&generator_pubkey()).to_vec());
        Ok(())
    }

    #[test]
    fn segwit_testnet_hrp() -> std::result::Result<(), WalletError> {
        let addr = segwit_v0(&generator_pubkey(), Network::Testnet)?;
        assert!(addr.starts_with("tb1q"));
        assert!(matches!(
            decode_segwit_for(&addr, Network::Mainnet),
            Err(WalletError::InvalidAddress { .. })
        ));
        Ok(())
    }

    #[test]
    fn v0_with_bech32m_checksum_rejected() -> std::result::Result<(), WalletError> {
        // Witness v0 program re-encoded with the wrong checksum variant.
        let mut data = vec![0u8];
        data.extend(bech32::convert_bits(&[0x11; 20], 8, 5, true)?);
        let wrong = bech32::encode("bc", &data, Variant::Bech32m)?;
        assert!(matches!(
            decode_segwit(&wrong),
            Err(WalletError::Bech32ChecksumError { .. })
        ));
        Ok(())
    }

    #[test]
    fn v1_with_bech32_checksum_rejected() -> std::result::Result<(), WalletError> {
        let mut data = vec![1u8];
        data.extend(bech32::convert_bits(&[0x22; 32], 8, 5, true)?);
        let wrong = bech32::encode("bc", &data, Variant::Bech32)?;
        assert!(matches!(
            decode_segwit(&wrong),
            Err(WalletError::Bech32ChecksumError { .. })
        ));
        Ok(())
    }

    #[test]
    fn bip350_v1_vector_decodes() -> std::result::Result<(), WalletError> {
        let (network, version, program) =
            decode_segwit("bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0")?;
        assert_eq!(network, Network::Mainnet);
        assert_eq!(version, 1);
        assert_eq!(
            program,
            from_hex::<32>("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
                .to_vec()
        );
        Ok(())
    }

    #[test]
    fn taproot_differs_from_internal_key() -> std::result::Result<(), WalletError> {
        let pk = generator_pubkey();
        let output = taproot_output_key(&pk)?;
        assert_ne!(&output[..], &pk[1..]);
        Ok(())
    }

    #[test]
    fn taproot_ignores_parity_of_internal_key() -> std::result::Result<(), WalletError> {
        let even = generator_pubkey();
        let mut odd = even;
        odd[0] = 0x03;
        assert_eq!(taproot_output_key(&even)?, taproot_output_key(&odd)?);
        Ok(())
    }

    #[test]
    fn taproot_rejects_invalid_point() {
        let mut bogus = [0u8; 33];
        bogus[0] = 0x02;
        bogus[1..].copy_from_slice(&[0xFF; 32]);
        assert!(matches!(
            taproot_output_key(&bogus),
            Err(WalletError::InvalidKey { .. })
        ));
    }

    #[test]
    fn p2sh_is_nested_segwit() -> std::result::Result<(), WalletError> {
        let addr = p2sh_p2wpkh(&generator_pubkey(), Network::Mainnet);
        assert!(addr.starts_with('3'));
        let decoded = decode_address(&addr, &SparkScheme::default())?;
        assert_eq!(decoded.kind, AddressKind::P2sh);

        let mut redeem = vec![0x00, 0x14];
        redeem.extend_from_slice(&hash160(&generator_pubkey()));
        assert_eq!(decoded.program, hash160(&redeem).to_vec());
        Ok(())
    }

    #[test]
    fn spark_roundtrip_and_namespace() -> std::result::Result<(), WalletError> {
        let scheme = SparkScheme::default();
        let addr = spark::encode(&generator_pubkey(), &scheme)?;
        assert!(addr.starts_with("sp1q"));
        assert!(spark::matches(&addr, &generator_pubkey(), &scheme));

        let decoded = decode_address(&addr, &scheme)?;
        assert_eq!(decoded.kind, AddressKind::Spark);
        assert_eq!(decoded.network, None);
        assert_eq!(decoded.program.len(), 32);
        Ok(())
    }

    #[test]
    fn spark_scheme_is_configurable() -> std::result::Result<(), WalletError> {
        let custom = SparkScheme {
            hrp: "sprt".into(),
            version: 1,
            ..SparkScheme::default()
        };
        let addr = spark::encode(&generator_pubkey(), &custom)?;
        assert!(addr.starts_with("sprt1p"));
        assert!(spark::decode(&addr, &SparkScheme::default()).is_err());
        assert_ne!(addr, spark::encode(&generator_pubkey(), &SparkScheme::default())?);
        Ok(())
    }

    #[test]
    fn spark_rejects_segwit_address() {
        let scheme = SparkScheme::default();
        assert!(matches!(
            spark::decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", &scheme),
            Err(WalletError::UnsupportedAddressScheme { .. })
        ));
    }

    #[test]
    fn decode_address_dispatch() -> std::result::Result<(), WalletError> {
        let scheme = SparkScheme::default();
        let pk = generator_pubkey();
        for kind in AddressKind::ALL {
            let addr = encode_address(kind, &pk, Network::Testnet, &scheme)?;
            let decoded = decode_address(&addr, &scheme)?;
            assert_eq!(decoded.kind, kind, "{addr}");
            if kind != AddressKind::Spark {
                assert_eq!(decoded.network, Some(Network::Testnet));
            }
        }
        Ok(())
    }

    #[test]
    fn decode_address_unknown_scheme() {
        let scheme = SparkScheme::default();
        for s in ["", "hello world", "ltc1qw508d6qejxtdg4y5r3zarvary0c5xw7kgmn4n9"] {
            assert!(matches!(
                decode_address(s, &scheme),
                Err(WalletError::UnsupportedAddressScheme { .. })
            ));
        }
    }

    #[test]
    fn decode_address_p2wsh_is_unsupported_kind() -> std::result::Result<(), WalletError> {
        let p2wsh = encode_segwit("bc", 0, &[0x33; 32])?;
        assert!(matches!(
            decode_address(&p2wsh, &SparkScheme::default()),
            Err(WalletError::UnsupportedAddressScheme { .. })
        ));
        Ok(())
    }

    #[test]
    fn decode_address_bad_base58_checksum() {
        let mut addr = p2pkh(&generator_pubkey(), Network::Mainnet);
        let last = addr.pop().unwrap_or('1');
        addr.push(if last == 'H' { 'J' } else { 'H' });
        assert!(matches!(
            decode_address(&addr, &SparkScheme::default()),
            Err(WalletError::Base58ChecksumError { .. })
        ));
    }
}
