//! Bundle commands: encrypt, decrypt, inspect, rekey.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use sparkvault_crypto::kdf::KdfParams;
use sparkvault_types::config::KdfMethod;
use sparkvault_wallet::background;
use sparkvault_wallet::vault::EncryptOptions;
use zeroize::Zeroizing;

use crate::output;
use crate::prompt;
use crate::GlobalOpts;

#[derive(Clone, Copy, ValueEnum)]
pub enum KdfArg {
    /// PBKDF2-HMAC-SHA512.
    Pbkdf2,
    /// scrypt.
    Scrypt,
}

impl From<KdfArg> for KdfMethod {
    fn from(arg: KdfArg) -> Self {
        match arg {
            KdfArg::Pbkdf2 => KdfMethod::Pbkdf2,
            KdfArg::Scrypt => KdfMethod::Scrypt,
        }
    }
}

#[derive(Args)]
pub struct EncryptArgs {
    /// File to encrypt (stdin when omitted).
    #[arg(long = "in")]
    pub input: Option<PathBuf>,
    /// Bundle file to write.
    #[arg(long)]
    pub out: PathBuf,
    /// Key derivation function (defaults to the configured one).
    #[arg(long, value_enum)]
    pub kdf: Option<KdfArg>,
}

#[derive(Args)]
pub struct DecryptArgs {
    /// Bundle file.
    pub bundle: PathBuf,
    /// Write the payload to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct RekeyArgs {
    /// Bundle file.
    pub bundle: PathBuf,
    /// Write the new bundle here instead of replacing the input.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub async fn encrypt(args: EncryptArgs, opts: &GlobalOpts) -> std::result::Result<(), String> {
    let mut config = opts.config.clone();
    if let Some(kdf) = args.kdf {
        config.kdf = kdf.into();
    }
    let engine = super::engine(&config)?;

    let payload = match args.input {
        Some(path) => Zeroizing::new(
            tokio::task::spawn_blocking(move || std::fs::read(&path))
                .await
                .map_err(|e| format!("failed to spawn blocking task: {e}"))?
                .map_err(|e| format!("failed to read input file: {e}"))?,
        ),
        None => prompt::stdin_bytes().await?,
    };

    let password = prompt::password(prompt::PASSWORD_ENV, "Bundle password", true)?;
    let bundle = background::encrypt_payload(&engine, payload, password)
        .await
        .map_err(|e| e.to_string())?;

    background::write_bundle(args.out.clone(), bundle)
        .await
        .map_err(|e| e.to_string())?;
    output::print_success(&format!("bundle written to {}", args.out.display()), opts.json);
    Ok(())
}

pub async fn decrypt(args: DecryptArgs, opts: &GlobalOpts) -> std::result::Result<(), String> {
    let engine = super::engine(&opts.config)?;
    let bundle = background::read_bundle(args.bundle)
        .await
        .map_err(|e| e.to_string())?;
    let password = prompt::password(prompt::PASSWORD_ENV, "Bundle password", false)?;

    let payload = background::decrypt_payload(&engine, bundle, password)
        .await
        .map_err(|e| e.to_string())?;

    match args.out {
        Some(path) => {
            tokio::fs::write(&path, payload.as_slice())
                .await
                .map_err(|e| format!("failed to write payload: {e}"))?;
            output::print_success(&format!("payload written to {}", path.display()), opts.json);
        }
        None if opts.json => {
            let obj = match std::str::from_utf8(&payload) {
                Ok(text) => serde_json::json!({ "payload": text }),
                Err(_) => serde_json::json!({ "payload_hex": hex::encode(payload.as_slice()) }),
            };
            println!("{obj}");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&payload)
                .and_then(|()| stdout.flush())
                .map_err(|e| format!("failed to write payload: {e}"))?;
        }
    }
    Ok(())
}

pub async fn inspect(path: PathBuf, opts: &GlobalOpts) -> std::result::Result<(), String> {
    let engine = super::engine(&opts.config)?;
    let bundle = background::read_bundle(path)
        .await
        .map_err(|e| e.to_string())?;
    let info = engine.vault().inspect(&bundle).map_err(|e| e.to_string())?;

    let (method, cost) = match info.kdf {
        KdfParams::Pbkdf2 { iterations } => {
            ("pbkdf2-sha512", format!("iterations={iterations}"))
        }
        KdfParams::Scrypt { log_n, r, p } => {
            ("scrypt", format!("N={} r={r} p={p}", 1u64 << log_n))
        }
    };
    let created = info.created_at.to_rfc3339();

    if opts.json {
        let obj = serde_json::json!({
            "version": info.version,
            "algorithm": bundle.algorithm,
            "kdf": method,
            "kdf_cost": cost,
            "created_at": created,
            "payload_len": info.payload_len,
        });
        println!("{obj}");
    } else {
        output::print_kv("Version", &info.version.to_string());
        output::print_kv("Algorithm", &bundle.algorithm);
        output::print_kv("KDF", &format!("{method} ({cost})"));
        output::print_kv("Created", &created);
        output::print_kv("Payload", &format!("{} bytes", info.payload_len));
    }
    Ok(())
}

pub async fn rekey(args: RekeyArgs, opts: &GlobalOpts) -> std::result::Result<(), String> {
    let engine = super::engine(&opts.config)?;
    let bundle = background::read_bundle(args.bundle.clone())
        .await
        .map_err(|e| e.to_string())?;
    let old_password = prompt::password(prompt::PASSWORD_ENV, "Current password", false)?;
    let new_password = prompt::password(prompt::NEW_PASSWORD_ENV, "New password", true)?;

    let vault = engine.vault().clone();
    let rekeyed = background::run_blocking(move || {
        vault.change_password(
            &bundle,
            &old_password,
            &new_password,
            &EncryptOptions::default(),
        )
    })
    .await
    .map_err(|e| e.to_string())?;

    let out = args.out.unwrap_or(args.bundle);
    background::write_bundle(out.clone(), rekeyed)
        .await
        .map_err(|e| e.to_string())?;
    output::print_success(&format!("bundle re-encrypted to {}", out.display()), opts.json);
    Ok(())
}
