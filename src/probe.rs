use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::sol;
use anyhow::{Context, Result};

use crate::clients::{self, ClientPool};
use crate::model::balance::{BalanceRecord, NATIVE_SENTINEL};
use crate::model::chain::ChainDescriptor;
use crate::model::token::TokenDescriptor;
use crate::sink::{ErrorLog, ErrorRecord};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Per-wallet cap on catalog entries probed for a chain. Bounds worst-case
/// call volume per wallet at `chains × (1 + TOKEN_PROBE_CAP)`.
pub const TOKEN_PROBE_CAP: usize = 20;

/// The first `cap` catalog entries, in catalog order.
pub fn capped(tokens: &[TokenDescriptor], cap: usize) -> &[TokenDescriptor] {
    &tokens[..tokens.len().min(cap)]
}

// ── Probes ───────────────────────────────────────────────────────────
//
// Both probes absorb their own failures: a failing call becomes an error-log
// entry plus a zero-balance record with the message attached, so one bad
// token or chain never aborts the wallet's remaining probes. The Result
// covers only filesystem errors from persisting the log entry.

pub async fn check_native_balance(
    pool: &mut ClientPool,
    chain: &ChainDescriptor,
    wallet: &str,
    errors: &mut ErrorLog,
) -> Result<BalanceRecord> {
    match native_balance(pool, chain, wallet).await {
        Ok(balance) => Ok(BalanceRecord::native(wallet, chain, balance, None)),
        Err(e) => {
            let msg = format!("{e:#}");
            errors.record(ErrorRecord {
                chain: chain.name.to_string(),
                token: chain.native_symbol.to_string(),
                token_address: NATIVE_SENTINEL.to_string(),
                wallet_address: wallet.to_string(),
                operation: "checkNativeBalance".into(),
                error: msg.clone(),
            })?;
            Ok(BalanceRecord::native(wallet, chain, 0.0, Some(msg)))
        }
    }
}

pub async fn check_erc20_balance(
    pool: &mut ClientPool,
    chain: &ChainDescriptor,
    wallet: &str,
    token: &TokenDescriptor,
    errors: &mut ErrorLog,
) -> Result<BalanceRecord> {
    match erc20_balance(pool, chain, wallet, token).await {
        Ok(balance) => Ok(BalanceRecord::erc20(wallet, chain, token, balance, None)),
        Err(e) => {
            let msg = format!("{e:#}");
            errors.record(ErrorRecord {
                chain: chain.name.to_string(),
                token: token.symbol.clone(),
                token_address: token.address.clone(),
                wallet_address: wallet.to_string(),
                operation: "checkERC20Balance".into(),
                error: msg.clone(),
            })?;
            Ok(BalanceRecord::erc20(wallet, chain, token, 0.0, Some(msg)))
        }
    }
}

// ── RPC calls ────────────────────────────────────────────────────────

async fn native_balance(
    pool: &mut ClientPool,
    chain: &ChainDescriptor,
    wallet: &str,
) -> Result<f64> {
    let address: Address = wallet.parse().context("invalid wallet address")?;
    let provider = pool.get(chain)?.clone();
    let raw = clients::retry_transport(|| {
        let provider = provider.clone();
        async move { Ok(provider.get_balance(address).await?) }
    })
    .await
    .with_context(|| format!("get_balance on {}", chain.name))?;
    Ok(to_decimal(raw, chain.native_decimals))
}

async fn erc20_balance(
    pool: &mut ClientPool,
    chain: &ChainDescriptor,
    wallet: &str,
    token: &TokenDescriptor,
) -> Result<f64> {
    let owner: Address = wallet.parse().context("invalid wallet address")?;
    let contract: Address = token
        .address
        .parse()
        .with_context(|| format!("invalid token contract address '{}'", token.address))?;
    let provider = pool.get(chain)?.clone();
    let raw = clients::retry_transport(|| {
        let provider = provider.clone();
        async move {
            let erc20 = IERC20::new(contract, provider);
            Ok(erc20.balanceOf(owner).call().await?)
        }
    })
    .await
    .with_context(|| format!("balanceOf {} on {}", token.symbol, chain.name))?;
    Ok(to_decimal(raw, token.decimals))
}

/// Smallest-unit integer to decimal balance.
fn to_decimal(raw: U256, decimals: u8) -> f64 {
    let value: f64 = raw.to_string().parse().unwrap_or(0.0);
    value / 10f64.powi(decimals as i32)
}
