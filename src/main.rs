use clap::Parser;

use balance_scan::{chains, cli, run};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Run {
            input,
            output_dir,
            token_cap,
            fast,
        } => run::run(&run::RunConfig {
            input,
            output_dir,
            token_cap,
            fast,
        }),
        cli::Command::Chains => chains::run(),
    }
}
