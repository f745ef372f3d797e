//! Wallet commands: generate, import, derive.

use clap::Args;
use serde::Serialize;
use sparkvault_crypto::address::encode_address;
use sparkvault_crypto::hd_derive::{DerivationPath, ExtendedPrivateKey};
use sparkvault_crypto::mnemonic::{mnemonic_to_seed, Mnemonic};
use sparkvault_crypto::wif::encode_wif;
use sparkvault_types::AddressKind;
use sparkvault_wallet::background;
use sparkvault_wallet::engine::WalletExport;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::output;
use crate::prompt;
use crate::GlobalOpts;

#[derive(Args)]
pub struct GenerateArgs {
    /// Entropy strength in bits: 128, 160, 192, 224 or 256.
    #[arg(long)]
    pub strength: Option<usize>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Mnemonic phrase (read from stdin when omitted).
    pub mnemonic: Option<String>,
}

#[derive(Args)]
pub struct DeriveArgs {
    /// Derivation path, e.g. "m/84'/0'/0'/0/0".
    #[arg(long)]
    pub path: String,
    /// Also encode the key's address under this scheme.
    #[arg(long)]
    pub kind: Option<AddressKind>,
    /// Include the extended private key and WIF in the output.
    #[arg(long)]
    pub private: bool,
    /// Mnemonic phrase (read from stdin when omitted).
    pub mnemonic: Option<String>,
}

pub async fn generate(args: GenerateArgs, opts: &GlobalOpts) -> std::result::Result<(), String> {
    let engine = super::engine(&opts.config)?;
    let strength = args.strength.unwrap_or(opts.config.strength_bits);

    let export = background::generate_wallet(&engine, strength, opts.network())
        .await
        .map_err(|e| e.to_string())?;

    print_export(&export, opts.json);
    Ok(())
}

pub async fn import(args: ImportArgs, opts: &GlobalOpts) -> std::result::Result<(), String> {
    let engine = super::engine(&opts.config)?;
    let mnemonic = prompt::mnemonic(args.mnemonic).await?;

    let passphrase = prompt::passphrase();

    let export = background::import_wallet(&engine, mnemonic, passphrase, opts.network())
        .await
        .map_err(|e| e.to_string())?;

    print_export(&export, opts.json);
    Ok(())
}

/// Key material shown by `derive`.
#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
struct DerivedView {
    path: String,
    depth: u8,
    fingerprint: String,
    public_key: String,
    xpub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    xprv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wif: Option<String>,
}

pub async fn derive(args: DeriveArgs, opts: &GlobalOpts) -> std::result::Result<(), String> {
    let engine = super::engine(&opts.config)?;
    let path = args
        .path
        .parse::<DerivationPath>()
        .map_err(|e| e.to_string())?;
    let phrase = prompt::mnemonic(args.mnemonic).await?;
    let passphrase = prompt::passphrase();
    let network = opts.network();
    let spark = engine.spark_scheme().clone();
    let (kind, private) = (args.kind, args.private);

    let view = background::run_blocking(move || {
        let mnemonic = Mnemonic::parse(&phrase)?;
        let seed = mnemonic_to_seed(mnemonic.as_str(), &passphrase)?;
        let key = ExtendedPrivateKey::master_from_seed(&seed)?.derive_path(&path)?;
        let public_key = key.public_key()?;

        let address = match kind {
            Some(kind) => Some(encode_address(kind, &public_key, network, &spark)?),
            None => None,
        };

        Ok(DerivedView {
            path: path.to_string(),
            depth: key.depth(),
            fingerprint: hex::encode(key.fingerprint()?),
            public_key: hex::encode(public_key),
            xpub: key.to_xpub(network)?,
            address,
            xprv: private.then(|| key.to_xprv(network)),
            wif: private.then(|| encode_wif(key.private_key(), network, true)),
        })
    })
    .await
    .map_err(|e| e.to_string())?;

    if opts.json {
        output::print_json(&view);
        return Ok(());
    }

    output::print_kv("Path", &view.path);
    output::print_kv("Depth", &view.depth.to_string());
    output::print_kv("Fingerprint", &view.fingerprint);
    output::print_kv("Public key", &view.public_key);
    output::print_kv("xpub", &view.xpub);
    if let Some(address) = &view.address {
        output::print_kv("Address", address);
    }
    if let (Some(xprv), Some(wif)) = (&view.xprv, &view.wif) {
        output::print_warning("private key material below; do not share it");
        output::print_kv("xprv", xprv);
        output::print_kv("WIF", wif);
    }
    Ok(())
}

fn print_export(export: &WalletExport, json_mode: bool) {
    if json_mode {
        output::print_json(export);
        return;
    }

    output::print_warning(
        "write the mnemonic down and keep it offline; anyone holding it controls the funds",
    );
    output::print_kv("Mnemonic", &export.mnemonic);
    output::print_kv("Network", &export.network.to_string());
    output::print_kv("Fingerprint", &export.master_fingerprint);
    println!();

    let rows: Vec<Vec<String>> = export
        .accounts
        .iter()
        .map(|a| {
            vec![
                a.kind.to_string(),
                a.path.clone(),
                a.address.clone(),
                a.wif.clone(),
            ]
        })
        .collect();
    output::print_table(&["scheme", "path", "address", "wif"], &rows);
}
