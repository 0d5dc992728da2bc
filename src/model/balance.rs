use serde::Serialize;

use crate::model::chain::ChainDescriptor;
use crate::model::token::TokenDescriptor;

/// Sentinel used in the `tokenAddress` column for native-coin rows.
pub const NATIVE_SENTINEL: &str = "native";

/// Kind of asset a balance row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Native,
    Erc20,
}

/// One probe result — the unit of output.
///
/// Serializes to the CSV schema
/// `address,chain,tokenType,symbol,balance,tokenAddress,tokenName`.
/// Never mutated after creation; a failed probe still produces a record,
/// with balance 0 and the error message attached (the error is kept out of
/// the CSV columns).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    pub address: String,
    pub chain: String,
    pub token_type: TokenType,
    pub symbol: String,
    pub balance: f64,
    pub token_address: String,
    pub token_name: String,
    #[serde(skip)]
    pub error: Option<String>,
}

impl BalanceRecord {
    /// Native-coin row for a wallet on a chain.
    pub fn native(wallet: &str, chain: &ChainDescriptor, balance: f64, error: Option<String>) -> Self {
        BalanceRecord {
            address: wallet.to_string(),
            chain: chain.name.to_string(),
            token_type: TokenType::Native,
            symbol: chain.native_symbol.to_string(),
            balance,
            token_address: NATIVE_SENTINEL.to_string(),
            token_name: chain.native_symbol.to_string(),
            error,
        }
    }

    /// ERC-20 row for a wallet / chain / token triple.
    pub fn erc20(
        wallet: &str,
        chain: &ChainDescriptor,
        token: &TokenDescriptor,
        balance: f64,
        error: Option<String>,
    ) -> Self {
        BalanceRecord {
            address: wallet.to_string(),
            chain: chain.name.to_string(),
            token_type: TokenType::Erc20,
            symbol: token.symbol.clone(),
            balance,
            token_address: token.address.clone(),
            token_name: token.name.clone(),
            error,
        }
    }
}
