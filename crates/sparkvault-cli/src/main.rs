//! sparkvault CLI.
//!
//! Local front end to the key engine. Nothing here touches the
//! network: every command works on arguments, stdin and bundle files.

mod commands;
mod config;
mod output;
mod prompt;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sparkvault_types::config::EngineConfig;
use sparkvault_types::Network;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// sparkvault: Bitcoin wallet keys, addresses and encrypted backups.
#[derive(Parser)]
#[command(name = "sparkvault", version, about)]
struct Cli {
    /// Output in JSON format (no colors, machine-readable).
    #[arg(long, global = true)]
    json: bool,

    /// Engine configuration file (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Network to encode for: mainnet or testnet.
    #[arg(long, global = true)]
    network: Option<Network>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new wallet and print its accounts.
    #[command(alias = "new")]
    Generate {
        #[command(flatten)]
        args: commands::wallet::GenerateArgs,
    },
    /// Restore a wallet from a mnemonic.
    #[command(alias = "restore")]
    Import {
        #[command(flatten)]
        args: commands::wallet::ImportArgs,
    },
    /// Derive the extended key at a path.
    Derive {
        #[command(flatten)]
        args: commands::wallet::DeriveArgs,
    },
    /// Decode and classify an address.
    Address {
        /// Address to decode.
        address: String,
    },
    /// Decode a WIF private key.
    Wif {
        /// WIF string to decode.
        wif: String,
    },
    /// Encrypt a payload into a bundle file.
    Encrypt {
        #[command(flatten)]
        args: commands::bundle::EncryptArgs,
    },
    /// Decrypt a bundle file.
    Decrypt {
        #[command(flatten)]
        args: commands::bundle::DecryptArgs,
    },
    /// Show a bundle's parameters without decrypting it.
    Inspect {
        /// Bundle file.
        bundle: PathBuf,
    },
    /// Re-encrypt a bundle under a new password.
    Rekey {
        #[command(flatten)]
        args: commands::bundle::RekeyArgs,
    },
}

// ---------------------------------------------------------------------------
// Global options passed to every command handler
// ---------------------------------------------------------------------------

/// Shared options threaded into command handlers.
pub struct GlobalOpts {
    pub json: bool,
    pub config: EngineConfig,
}

impl GlobalOpts {
    /// Network selected by flag or configuration.
    pub fn network(&self) -> Network {
        self.config.network
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match config::load(cli.config.as_deref(), cli.network) {
        Ok(config) => {
            let opts = GlobalOpts {
                json: cli.json,
                config,
            };
            dispatch(opts, cli.command).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        output::print_error(&e, cli.json);
        std::process::exit(1);
    }
}

async fn dispatch(opts: GlobalOpts, cmd: Commands) -> std::result::Result<(), String> {
    match cmd {
        Commands::Generate { args } => commands::wallet::generate(args, &opts).await,
        Commands::Import { args } => commands::wallet::import(args, &opts).await,
        Commands::Derive { args } => commands::wallet::derive(args, &opts).await,
        Commands::Address { address } => commands::codec::address(&address, &opts),
        Commands::Wif { wif } => commands::codec::wif(&wif, &opts),
        Commands::Encrypt { args } => commands::bundle::encrypt(args, &opts).await,
        Commands::Decrypt { args } => commands::bundle::decrypt(args, &opts).await,
        Commands::Inspect { bundle } => commands::bundle::inspect(bundle, &opts).await,
        Commands::Rekey { args } => commands::bundle::rekey(args, &opts).await,
    }
}
