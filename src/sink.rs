use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::balance::BalanceRecord;

pub const ALL_BALANCES_FILE: &str = "wallet-balances.csv";
pub const NONZERO_BALANCES_FILE: &str = "wallets-with-balance.csv";
pub const ERROR_CSV_FILE: &str = "balance-check-errors.csv";
pub const ERROR_JSON_FILE: &str = "balance-check-errors.json";

const BALANCE_HEADER: &[&str] = &[
    "address",
    "chain",
    "tokenType",
    "symbol",
    "balance",
    "tokenAddress",
    "tokenName",
];
const ERROR_HEADER: &[&str] = &[
    "chain",
    "token",
    "tokenAddress",
    "walletAddress",
    "operation",
    "error",
];

// ── Balance outputs ──────────────────────────────────────────────────

/// The two balance destinations: every record, and the `balance > 0` subset.
///
/// Both are append-only CSVs; rows are flushed immediately after production,
/// never buffered to end-of-run. Init is idempotent: a missing file gets a
/// header row, an existing file is left untouched so a resumed run extends
/// earlier results.
pub struct Sink {
    all_path: PathBuf,
    nonzero_path: PathBuf,
}

impl Sink {
    pub fn init(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("creating output directory {}", output_dir.display()))?;
        let all_path = output_dir.join(ALL_BALANCES_FILE);
        let nonzero_path = output_dir.join(NONZERO_BALANCES_FILE);
        ensure_header(&all_path, BALANCE_HEADER)?;
        ensure_header(&nonzero_path, BALANCE_HEADER)?;
        Ok(Sink {
            all_path,
            nonzero_path,
        })
    }

    /// Append a record to the all-balances file, and to the non-zero file
    /// when its balance is strictly positive.
    pub fn append(&self, record: &BalanceRecord) -> Result<()> {
        append_row(&self.all_path, record)?;
        if record.balance > 0.0 {
            append_row(&self.nonzero_path, record)?;
        }
        Ok(())
    }
}

// ── Error log ────────────────────────────────────────────────────────

/// One absorbed failure. `wallet_address` is "N/A" for errors that are not
/// scoped to a wallet (catalog fetches, top-level failures).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub chain: String,
    pub token: String,
    pub token_address: String,
    pub wallet_address: String,
    pub operation: String,
    pub error: String,
}

/// Error collector for one run, owned by the run context.
///
/// `record` is append-and-persist: the entry is kept in memory, appended to
/// the error CSV, and the JSON mirror is rewritten as a whole document
/// (last-write-wins, not incremental). Entries are never removed.
pub struct ErrorLog {
    csv_path: PathBuf,
    json_path: PathBuf,
    records: Vec<ErrorRecord>,
}

impl ErrorLog {
    pub fn open(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("creating output directory {}", output_dir.display()))?;
        let csv_path = output_dir.join(ERROR_CSV_FILE);
        ensure_header(&csv_path, ERROR_HEADER)?;
        Ok(ErrorLog {
            csv_path,
            json_path: output_dir.join(ERROR_JSON_FILE),
            records: Vec::new(),
        })
    }

    pub fn record(&mut self, record: ErrorRecord) -> Result<()> {
        append_row(&self.csv_path, &record)?;
        self.records.push(record);
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.json_path, json)
            .with_context(|| format!("writing {}", self.json_path.display()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── CSV helpers ──────────────────────────────────────────────────────

fn ensure_header(path: &Path, header: &[&str]) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;
    wtr.write_record(header)?;
    wtr.flush()?;
    Ok(())
}

fn append_row<T: Serialize>(path: &Path, row: &T) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    wtr.serialize(row)?;
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::balance::{BalanceRecord, TokenType};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("balance-scan-sink-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn record(balance: f64) -> BalanceRecord {
        BalanceRecord {
            address: "0xabc".into(),
            chain: "ethereum".into(),
            token_type: TokenType::Erc20,
            symbol: "USDC".into(),
            balance,
            token_address: "0xdef".into(),
            token_name: "USD Coin".into(),
            error: None,
        }
    }

    fn count_rows(path: &Path) -> usize {
        let content = std::fs::read_to_string(path).unwrap();
        content.lines().count()
    }

    #[test]
    fn nonzero_filter() {
        let dir = scratch_dir("nonzero");
        let sink = Sink::init(&dir).unwrap();
        sink.append(&record(0.0)).unwrap();
        sink.append(&record(1.5)).unwrap();
        sink.append(&record(0.0)).unwrap();

        // header + 3 rows vs header + 1 row
        assert_eq!(count_rows(&dir.join(ALL_BALANCES_FILE)), 4);
        assert_eq!(count_rows(&dir.join(NONZERO_BALANCES_FILE)), 2);
    }

    #[test]
    fn init_is_idempotent() {
        let dir = scratch_dir("idempotent");
        let sink = Sink::init(&dir).unwrap();
        sink.append(&record(2.0)).unwrap();

        // Re-init must not clobber earlier rows.
        let sink = Sink::init(&dir).unwrap();
        sink.append(&record(3.0)).unwrap();
        assert_eq!(count_rows(&dir.join(ALL_BALANCES_FILE)), 3);
    }

    #[test]
    fn header_row_schema() {
        let dir = scratch_dir("header");
        Sink::init(&dir).unwrap();
        let content = std::fs::read_to_string(dir.join(ALL_BALANCES_FILE)).unwrap();
        assert_eq!(
            content.lines().next().unwrap(),
            "address,chain,tokenType,symbol,balance,tokenAddress,tokenName"
        );
    }

    #[test]
    fn error_log_mirrors_json() {
        let dir = scratch_dir("mirror");
        let mut log = ErrorLog::open(&dir).unwrap();
        for i in 0..3 {
            log.record(ErrorRecord {
                chain: "ethereum".into(),
                token: "USDC".into(),
                token_address: "0xdef".into(),
                wallet_address: format!("0x{i}"),
                operation: "checkERC20Balance".into(),
                error: "timeout".into(),
            })
            .unwrap();

            // After every record: JSON array length == CSV rows minus header.
            let json: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(dir.join(ERROR_JSON_FILE)).unwrap())
                    .unwrap();
            let csv_rows = count_rows(&dir.join(ERROR_CSV_FILE)) - 1;
            assert_eq!(json.as_array().unwrap().len(), csv_rows);
        }

        // Field values of the last entry match between the two mirrors.
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join(ERROR_JSON_FILE)).unwrap())
                .unwrap();
        let last = &json.as_array().unwrap()[2];
        assert_eq!(last["walletAddress"], "0x2");
        assert_eq!(last["operation"], "checkERC20Balance");

        let csv_content = std::fs::read_to_string(dir.join(ERROR_CSV_FILE)).unwrap();
        let last_row = csv_content.lines().last().unwrap();
        assert_eq!(last_row, "ethereum,USDC,0xdef,0x2,checkERC20Balance,timeout");
    }
}
