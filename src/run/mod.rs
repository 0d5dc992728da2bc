pub mod config;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::catalog;
use crate::clients::ClientPool;
use crate::model::chain;
use crate::model::token::TokenDescriptor;
use crate::pacing::Pacing;
use crate::probe;
use crate::sink::{ErrorLog, ErrorRecord, Sink};
use crate::wallets::WalletList;

use config::RuntimeConfig;

/// CLI-derived options for the `run` command.
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub token_cap: usize,
    pub fast: bool,
}

/// Run the batch job: read the wallet list, probe every (wallet × chain)
/// pair, stream results to the output files, checkpoint per wallet.
pub fn run(config: &RunConfig) -> Result<()> {
    // Install the rustls crypto provider before any TLS connection is made.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    rt.block_on(run_async(config))
}

async fn run_async(config: &RunConfig) -> Result<()> {
    let runtime = RuntimeConfig::from_env()?;
    let pacing = if config.fast {
        Pacing::none()
    } else {
        Pacing::standard()
    };

    println!(
        "balance-scan run started {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );

    let sink = Sink::init(&config.output_dir)?;
    let mut errors = ErrorLog::open(&config.output_dir)?;

    match process_wallets(config, &runtime, &pacing, &sink, &mut errors).await {
        Ok(summary) => {
            println!(
                "\nDone: {} wallets processed, {} balance rows written, {} errors recorded.",
                summary.wallets,
                summary.records,
                errors.len()
            );
            Ok(())
        }
        Err(e) => {
            // Unexpected top-level failure (bad input file, unwritable disk).
            // Best-effort: get it into the error trail before propagating.
            let _ = errors.record(ErrorRecord {
                chain: "N/A".into(),
                token: "N/A".into(),
                token_address: "N/A".into(),
                wallet_address: "N/A".into(),
                operation: "processWallets".into(),
                error: format!("{e:#}"),
            });
            Err(e)
        }
    }
}

struct RunSummary {
    wallets: usize,
    records: usize,
}

async fn process_wallets(
    config: &RunConfig,
    runtime: &RuntimeConfig,
    pacing: &Pacing,
    sink: &Sink,
    errors: &mut ErrorLog,
) -> Result<RunSummary> {
    let mut wallet_list = WalletList::load(&config.input)?;
    let wallets = wallet_list.eligible_wallets();
    let chains = chain::registry();

    println!(
        "{} eligible wallets across {} chains",
        wallets.len(),
        chains.len()
    );
    if wallets.is_empty() {
        println!("Nothing to do.");
        return Ok(RunSummary {
            wallets: 0,
            records: 0,
        });
    }

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .user_agent("balance-scan/0.1")
        .build()
        .context("creating HTTP client")?;

    // Catalogs are fetched once per chain per run, before any wallet work.
    // A failed fetch leaves that chain with zero tokens; its native probes
    // still run.
    let mut catalogs: HashMap<u64, Vec<TokenDescriptor>> = HashMap::new();
    for c in chains {
        let tokens = catalog::fetch_token_list(
            &http,
            &runtime.catalog_base,
            &runtime.bearer_token,
            c.chain_id,
            errors,
        )
        .await?;
        println!("{}: {} tokens in catalog", c.name, tokens.len());
        catalogs.insert(c.chain_id, tokens);
        pacing.after_catalog().await;
    }

    let mut pool = ClientPool::new();
    let mut records = 0usize;

    let pb = indicatif::ProgressBar::new(wallets.len() as u64);
    pb.set_style(
        indicatif::ProgressStyle::default_bar()
            .template("  Wallets [{bar:40}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    for (i, wallet) in wallets.iter().enumerate() {
        println!("\nProcessing wallet {}/{}: {}", i + 1, wallets.len(), wallet);

        for c in chains {
            let catalog = catalogs
                .get(&c.chain_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let probed = probe::capped(catalog, config.token_cap);

            pacing.before_native().await;
            let record = probe::check_native_balance(&mut pool, c, wallet, errors).await?;
            sink.append(&record)?;
            records += 1;

            for token in probed {
                pacing.before_token().await;
                let record =
                    probe::check_erc20_balance(&mut pool, c, wallet, token, errors).await?;
                sink.append(&record)?;
                records += 1;
            }
            println!("  {} done (native + {} tokens)", c.name, probed.len());
        }

        // The wallet is complete — success or partial failure — so make that
        // durable before moving on.
        wallet_list.checkpoint(wallet)?;
        pb.inc(1);
        pacing.after_wallet(i + 1).await;
    }
    pb.finish_and_clear();

    Ok(RunSummary {
        wallets: wallets.len(),
        records,
    })
}
