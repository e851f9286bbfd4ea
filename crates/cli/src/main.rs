use clap::{Parser, Subcommand};
use ledger_trust_cli::commands::{forget, inspect, pin, show, verify};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trustctl")]
#[command(about = "Inspect and manage local ledger trust anchors", long_about = None)]
struct Cli {
    /// Directory holding the trust state records.
    #[arg(long, short, global = true, env = "LEDGER_TRUST_STATE_DIR", default_value = "./ledger_trust_state")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every trust anchor in the state directory
    Inspect,
    /// Check the checksum of every record
    Verify,
    /// Show the anchor of one server
    Show {
        identity: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pin a known-good anchor obtained out of band
    Pin {
        identity: String,

        #[arg(long)]
        tx: u64,

        /// Accumulated hash of the transaction, hex encoded
        #[arg(long)]
        hash: String,

        /// Server signature, hex encoded
        #[arg(long)]
        signature: Option<String>,
    },
    /// Drop the anchor of one server
    Forget { identity: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect => inspect::run(&cli.dir),
        Commands::Verify => verify::run(&cli.dir),
        Commands::Show { identity, json } => show::run(&cli.dir, &identity, json),
        Commands::Pin {
            identity,
            tx,
            hash,
            signature,
        } => pin::run(&cli.dir, &identity, tx, &hash, signature.as_deref()).map(|_| ()),
        Commands::Forget { identity } => forget::run(&cli.dir, &identity).map(|_| ()),
    }
}
