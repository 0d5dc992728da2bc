use serde::Deserialize;

/// A token contract to probe, as served by the catalog endpoint.
///
/// Populated once per chain per run and read-only afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenDescriptor {
    /// Contract address (0x-prefixed hex).
    pub address: String,
    /// Ticker symbol (e.g. "USDC").
    pub symbol: String,
    /// Display name (e.g. "USD Coin").
    pub name: String,
    /// Decimal precision. The catalog omits this for some entries; 18 is the
    /// ERC-20 convention and the safe default.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    18
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_default_to_18() {
        let token: TokenDescriptor = serde_json::from_str(
            r#"{"address":"0xabc","symbol":"FOO","name":"Foo Token"}"#,
        )
        .unwrap();
        assert_eq!(token.decimals, 18);
    }

    #[test]
    fn explicit_decimals_are_kept() {
        let token: TokenDescriptor = serde_json::from_str(
            r#"{"address":"0xabc","symbol":"USDC","name":"USD Coin","decimals":6}"#,
        )
        .unwrap();
        assert_eq!(token.decimals, 6);
    }
}
