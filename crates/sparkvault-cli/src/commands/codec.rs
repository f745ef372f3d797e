//! Codec commands: address and WIF decoding.

use sparkvault_crypto::address::{decode_address, encode_address, SparkScheme};
use sparkvault_crypto::hd_derive::public_key_from_private;
use sparkvault_crypto::wif::decode_wif;
use sparkvault_types::AddressKind;

use crate::output;
use crate::GlobalOpts;

/// Address schemes derivable from a single compressed key.
const KEY_SCHEMES: [AddressKind; 4] = [
    AddressKind::P2pkh,
    AddressKind::P2sh,
    AddressKind::SegwitV0,
    AddressKind::Taproot,
];

pub fn address(address: &str, opts: &GlobalOpts) -> std::result::Result<(), String> {
    let scheme = SparkScheme::from_config(&opts.config);
    let decoded = decode_address(address.trim(), &scheme).map_err(|e| e.to_string())?;
    let network = decoded
        .network
        .map(|n| n.to_string())
        .unwrap_or_else(|| "n/a".into());

    if opts.json {
        let obj = serde_json::json!({
            "address": address.trim(),
            "kind": decoded.kind,
            "network": decoded.network,
            "program": hex::encode(&decoded.program),
        });
        println!("{obj}");
    } else {
        output::print_kv("Kind", &decoded.kind.to_string());
        output::print_kv("Network", &network);
        output::print_kv("Program", &hex::encode(&decoded.program));
    }
    Ok(())
}

pub fn wif(wif: &str, opts: &GlobalOpts) -> std::result::Result<(), String> {
    let key = decode_wif(wif.trim()).map_err(|e| e.to_string())?;
    let public_key = public_key_from_private(key.private_key()).map_err(|e| e.to_string())?;
    let network = key.network();

    // Uncompressed WIFs belong to legacy uncompressed-key addresses,
    // which the encoders here do not produce.
    let mut addresses = serde_json::Map::new();
    if key.compressed() {
        let scheme = SparkScheme::from_config(&opts.config);
        for kind in KEY_SCHEMES {
            let addr = encode_address(kind, &public_key, network, &scheme)
                .map_err(|e| e.to_string())?;
            addresses.insert(kind.to_string(), serde_json::Value::String(addr));
        }
    }

    if opts.json {
        let obj = serde_json::json!({
            "network": network,
            "compressed": key.compressed(),
            "public_key": hex::encode(public_key),
            "addresses": addresses,
        });
        println!("{obj}");
    } else {
        output::print_kv("Network", &network.to_string());
        output::print_kv("Compressed", &key.compressed().to_string());
        output::print_kv("Public key", &hex::encode(public_key));
        for (kind, addr) in &addresses {
            output::print_kv(kind, addr.as_str().unwrap_or_default());
        }
    }
    Ok(())
}
