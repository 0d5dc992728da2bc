use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::token::TokenDescriptor;
use crate::sink::{ErrorLog, ErrorRecord};

#[derive(Debug, Deserialize)]
struct TokenListResponse {
    data: Vec<TokenDescriptor>,
}

/// Fetch the token catalog for a chain.
///
/// One network call per chain per run, before wallet processing begins.
/// Every failure — network, auth, malformed payload — is absorbed: it lands
/// in the error log (operation `fetchTokenList`, wallet "N/A") and the chain
/// proceeds with zero tokens rather than aborting the run. The returned
/// error covers only filesystem problems while persisting the log entry.
pub async fn fetch_token_list(
    client: &reqwest::Client,
    base_url: &str,
    bearer_token: &str,
    chain_id: u64,
    errors: &mut ErrorLog,
) -> Result<Vec<TokenDescriptor>> {
    match try_fetch(client, base_url, bearer_token, chain_id).await {
        Ok(tokens) => Ok(tokens),
        Err(e) => {
            errors.record(ErrorRecord {
                chain: chain_id.to_string(),
                token: "N/A".into(),
                token_address: "N/A".into(),
                wallet_address: "N/A".into(),
                operation: "fetchTokenList".into(),
                error: format!("{e:#}"),
            })?;
            Ok(Vec::new())
        }
    }
}

async fn try_fetch(
    client: &reqwest::Client,
    base_url: &str,
    bearer_token: &str,
    chain_id: u64,
) -> Result<Vec<TokenDescriptor>> {
    let url = format!("{}/dex/guest/tokenlist/{chain_id}", base_url.trim_end_matches('/'));
    let resp = client
        .get(&url)
        .header("authorization", format!("Bearer {bearer_token}"))
        .send()
        .await
        .context("sending catalog request")?
        .error_for_status()
        .context("catalog returned error status")?
        .json::<TokenListResponse>()
        .await
        .context("decoding catalog payload")?;
    Ok(resp.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_expected_payload_shape() {
        let resp: TokenListResponse = serde_json::from_str(
            r#"{"data":[
                {"address":"0x1","symbol":"USDC","name":"USD Coin","decimals":6},
                {"address":"0x2","symbol":"WETH","name":"Wrapped Ether"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.data[0].decimals, 6);
        assert_eq!(resp.data[1].decimals, 18);
    }

    #[test]
    fn rejects_missing_data_field() {
        let resp: Result<TokenListResponse, _> = serde_json::from_str(r#"{"tokens":[]}"#);
        assert!(resp.is_err());
    }
}
