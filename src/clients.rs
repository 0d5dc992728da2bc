use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Duration;

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use anyhow::{Context, Result};

use crate::model::chain::ChainDescriptor;

/// Automatic retries per RPC call, applied to transport-level failures only.
const TRANSPORT_RETRIES: u32 = 3;
const RETRY_SPACING: Duration = Duration::from_secs(1);

/// Lazily-built cache of one HTTP provider per chain.
///
/// Owned by the run context. Handles are created on first use and live for
/// the whole run; there is no eviction.
pub struct ClientPool {
    clients: HashMap<u64, DynProvider>,
}

impl ClientPool {
    pub fn new() -> Self {
        ClientPool {
            clients: HashMap::new(),
        }
    }

    /// Cached provider for a chain, creating it on first use.
    pub fn get(&mut self, chain: &ChainDescriptor) -> Result<&DynProvider> {
        match self.clients.entry(chain.chain_id) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(v) => {
                let url = chain
                    .rpc_url
                    .parse()
                    .with_context(|| format!("invalid RPC URL for chain '{}'", chain.name))?;
                Ok(v.insert(ProviderBuilder::new().connect_http(url).erased()))
            }
        }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.clients.len()
    }
}

impl Default for ClientPool {
    fn default() -> Self {
        Self::new()
    }
}

// ── Transport retry ──────────────────────────────────────────────────

/// Retry an RPC call with fixed spacing between attempts.
///
/// Only transport-level failures (unreachable endpoint, timeout, rate limit)
/// are retried; application-level error responses such as reverts fail
/// immediately.
pub async fn retry_transport<T, F, Fut>(f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..=TRANSPORT_RETRIES {
        match f().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !is_transport_error(&e) {
                    return Err(e);
                }
                last_err = Some(e);
                if attempt < TRANSPORT_RETRIES {
                    tokio::time::sleep(RETRY_SPACING).await;
                }
            }
        }
    }
    Err(last_err.unwrap())
}

type RpcFailure = alloy::transports::RpcError<alloy::transports::TransportErrorKind>;

fn is_transport_error(err: &anyhow::Error) -> bool {
    if let Some(e) = err.downcast_ref::<alloy::contract::Error>() {
        return match e {
            alloy::contract::Error::TransportError(inner) => is_transport_rpc(inner),
            _ => false,
        };
    }
    if let Some(e) = err.downcast_ref::<RpcFailure>() {
        return is_transport_rpc(e);
    }
    // Errors of unknown provenance (e.g. mid-flight connection drops surfaced
    // through other wrappers) get the retry.
    true
}

fn is_transport_rpc(err: &RpcFailure) -> bool {
    !matches!(err, alloy::transports::RpcError::ErrorResp(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let attempts = AtomicU32::new(0);
        let result: Result<u32> = retry_transport(|| async {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                anyhow::bail!("connection refused")
            }
            Ok(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let attempts = AtomicU32::new(0);
        let result: Result<u32> = retry_transport(|| async {
            attempts.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("timeout")
        })
        .await;
        assert!(result.is_err());
        // Initial attempt plus TRANSPORT_RETRIES.
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn pool_starts_empty() {
        assert_eq!(ClientPool::new().len(), 0);
    }
}
