use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletListError {
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("wallet list is missing column `{0}`")]
    MissingColumn(&'static str),
}

const ADDRESS_COLUMN: &str = "verified_credential_address";
const FORMAT_COLUMN: &str = "verified_credential_format";
const PROVIDER_COLUMN: &str = "verified_credential_walletProvider";

const ELIGIBLE_FORMAT: &str = "blockchain";
const ELIGIBLE_PROVIDER: &str = "embeddedWallet";

/// The persisted wallet source list — both work queue and checkpoint store.
///
/// Rows are kept as raw CSV records so columns beyond the three we read
/// survive the per-wallet rewrites untouched. The on-disk file is the source
/// of truth for "what remains to do": after a wallet's full cross-chain
/// probe completes, [`WalletList::checkpoint`] durably removes its eligible
/// rows, making a crashed or restarted run skip already-completed wallets.
#[derive(Debug)]
pub struct WalletList {
    path: PathBuf,
    headers: csv::StringRecord,
    rows: Vec<csv::StringRecord>,
    addr_idx: usize,
    format_idx: usize,
    provider_idx: usize,
}

impl WalletList {
    pub fn load(path: &Path) -> Result<Self, WalletListError> {
        let csv_err = |source| WalletListError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        let headers = reader.headers().map_err(csv_err)?.clone();
        let col = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(WalletListError::MissingColumn(name))
        };
        let addr_idx = col(ADDRESS_COLUMN)?;
        let format_idx = col(FORMAT_COLUMN)?;
        let provider_idx = col(PROVIDER_COLUMN)?;
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_err)?;
        Ok(WalletList {
            path: path.to_path_buf(),
            headers,
            rows,
            addr_idx,
            format_idx,
            provider_idx,
        })
    }

    /// Distinct eligible addresses, in first-seen order. Duplicate addresses
    /// collapse case-insensitively (hex addresses carry no case meaning).
    pub fn eligible_wallets(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut wallets = Vec::new();
        for row in &self.rows {
            if !row_eligible(row, self.addr_idx, self.format_idx, self.provider_idx) {
                continue;
            }
            let addr = row.get(self.addr_idx).unwrap_or("").to_string();
            if seen.insert(addr.to_ascii_lowercase()) {
                wallets.push(addr);
            }
        }
        wallets
    }

    /// Durably remove a completed wallet's eligible rows.
    ///
    /// The sole mutation of the source list: filter the in-memory rows, then
    /// rewrite the file via temp-file-and-rename so the list on disk is
    /// always either the old state or the new state, never a partial write.
    /// Fires once per wallet, after its full per-chain loop — probe failures
    /// do not block completion.
    pub fn checkpoint(&mut self, wallet: &str) -> Result<(), WalletListError> {
        let (ai, fi, pi) = (self.addr_idx, self.format_idx, self.provider_idx);
        self.rows.retain(|row| {
            let matches = row_eligible(row, ai, fi, pi)
                && row.get(ai).unwrap_or("").eq_ignore_ascii_case(wallet);
            !matches
        });
        self.rewrite()
    }

    pub fn remaining_rows(&self) -> usize {
        self.rows.len()
    }

    fn rewrite(&self) -> Result<(), WalletListError> {
        let csv_err = |source| WalletListError::Csv {
            path: self.path.clone(),
            source,
        };
        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut wtr = csv::Writer::from_path(&tmp).map_err(csv_err)?;
            wtr.write_record(&self.headers).map_err(csv_err)?;
            for row in &self.rows {
                wtr.write_record(row).map_err(csv_err)?;
            }
            wtr.flush().map_err(|e| WalletListError::Io {
                path: tmp.clone(),
                source: e,
            })?;
        }
        std::fs::rename(&tmp, &self.path).map_err(|e| WalletListError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}

fn row_eligible(row: &csv::StringRecord, ai: usize, fi: usize, pi: usize) -> bool {
    let addr = row.get(ai).unwrap_or("");
    row.get(fi).unwrap_or("") == ELIGIBLE_FORMAT
        && row.get(pi).unwrap_or("") == ELIGIBLE_PROVIDER
        && addr.starts_with("0x")
}
