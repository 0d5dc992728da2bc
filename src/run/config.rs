use anyhow::Result;

/// Secrets and endpoints loaded from the process environment.
pub struct RuntimeConfig {
    /// Bearer token for the token catalog service.
    pub bearer_token: String,
    /// Base URL of the catalog service; the tokenlist path is appended.
    pub catalog_base: String,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self> {
        let bearer_token = std::env::var("BALANCE_SCAN_API_TOKEN").map_err(|_| {
            anyhow::anyhow!(
                "BALANCE_SCAN_API_TOKEN env var not set. \
                 Set it to the catalog service bearer token."
            )
        })?;
        let catalog_base = std::env::var("BALANCE_SCAN_CATALOG_URL").map_err(|_| {
            anyhow::anyhow!(
                "BALANCE_SCAN_CATALOG_URL env var not set. \
                 Set it to the catalog service base URL, e.g. https://dex.example.com"
            )
        })?;
        Ok(RuntimeConfig {
            bearer_token,
            catalog_base,
        })
    }
}
