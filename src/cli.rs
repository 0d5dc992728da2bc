use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cross-chain wallet balance poller — probes native and ERC-20 balances
/// for every eligible wallet in a CSV export, resumably.
#[derive(Parser)]
#[command(name = "balance-scan", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Poll balances for every eligible wallet in the input CSV
    Run {
        /// Path to the wallet export CSV (rewritten in place as wallets complete)
        #[arg(long, default_value = "wallets.csv")]
        input: PathBuf,

        /// Directory for the balance CSVs and the error log
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Max tokens probed per chain per wallet
        #[arg(long, default_value = "20")]
        token_cap: usize,

        /// Skip all pacing delays (for tests against local endpoints)
        #[arg(long)]
        fast: bool,
    },

    /// Print the configured chain registry
    Chains,
}
