use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nsr",
    about = "Name registry: buy names, set their values, replay operation logs",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply a JSON array of operation envelopes in order
    Apply(ApplyArgs),
    /// Print the canonical sign bytes of one operation envelope
    SignBytes(SignBytesArgs),
    /// Derive an address from a seed, or generate a random one
    Address(AddressArgs),
}

#[derive(Args)]
pub struct ApplyArgs {
    /// File holding the envelopes, e.g. `[{"type": "nameservice/BuyName", "value": {...}}]`
    pub ops: PathBuf,
    /// TOML file with `[registry]` settings and `[[genesis.balances]]`
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Names to look up once every operation has been applied
    #[arg(long)]
    pub whois: Vec<String>,
    /// Accounts whose final balance should be printed
    #[arg(long)]
    pub balance: Vec<String>,
}

#[derive(Args)]
pub struct SignBytesArgs {
    pub op: PathBuf,
    /// Print hex instead of the JSON text
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args)]
pub struct AddressArgs {
    pub seed: Option<String>,
}
