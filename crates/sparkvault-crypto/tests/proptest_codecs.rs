use proptest::prelude::*;

use sparkvault_crypto::base58::{check_decode, check_encode};
use sparkvault_crypto::bech32::{decode, encode, Variant};
use sparkvault_crypto::mnemonic::{entropy_to_mnemonic, mnemonic_to_entropy};
use sparkvault_types::WalletError;

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BECH32_CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn base58check_detects_single_substitution(
        version in any::<u8>(),
        payload in prop::collection::vec(any::<u8>(), 20..=33),
        pos in any::<prop::sample::Index>(),
        sym in any::<prop::sample::Index>(),
    ) {
        let encoded = check_encode(version, &payload);
        let mut bytes = encoded.clone().into_bytes();
        let i = pos.index(bytes.len());
        let replacement = BASE58_ALPHABET[sym.index(BASE58_ALPHABET.len())];
        prop_assume!(bytes[i] != replacement);
        bytes[i] = replacement;

        let corrupted = String::from_utf8(bytes).unwrap_or_default();
        prop_assert!(
            matches!(check_decode(&corrupted), Err(WalletError::Base58ChecksumError { .. })),
            "substitution at {} went undetected", i
        );
    }

    #[test]
    fn bech32_detects_single_substitution(
        data in prop::collection::vec(0u8..32, 1..40),
        bech32m in any::<bool>(),
        pos in any::<prop::sample::Index>(),
        sym in any::<prop::sample::Index>(),
    ) {
        let variant = if bech32m { Variant::Bech32m } else { Variant::Bech32 };
        let encoded = encode("bc", &data, variant).unwrap_or_default();
        prop_assume!(!encoded.is_empty());

        // Corrupt a data or checksum symbol (after "bc1").
        let mut bytes = encoded.into_bytes();
        let i = 3 + pos.index(bytes.len() - 3);
        let replacement = BECH32_CHARSET[sym.index(BECH32_CHARSET.len())];
        prop_assume!(bytes[i] != replacement);
        bytes[i] = replacement;

        let corrupted = String::from_utf8(bytes).unwrap_or_default();
        prop_assert!(
            matches!(decode(&corrupted), Err(WalletError::Bech32ChecksumError { .. })),
            "substitution at {} went undetected", i
        );
    }

    #[test]
    fn mnemonic_entropy_roundtrip(len_index in 0usize..5, seed in prop::array::uniform32(any::<u8>())) {
        let len = [16, 20, 24, 28, 32][len_index];
        let mnemonic = entropy_to_mnemonic(&seed[..len]).unwrap_or_else(|e| panic!("{e}"));
        let recovered = mnemonic_to_entropy(mnemonic.as_str()).unwrap_or_else(|e| panic!("{e}"));
        prop_assert_eq!(recovered.as_slice(), &seed[..len]);
    }
}
