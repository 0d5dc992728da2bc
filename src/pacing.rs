use std::time::Duration;

/// Fixed-delay pacing policy consulted by the pipeline loop.
///
/// Static waits, not a token-bucket limiter: the goal is rough rate-limit
/// compliance for the third-party RPC and catalog endpoints. The transport
/// retry spacing in the client pool is separate and unaffected.
#[derive(Debug, Clone)]
pub struct Pacing {
    /// Wait after each chain's catalog fetch.
    pub catalog_delay: Duration,
    /// Wait before each native-balance probe.
    pub native_delay: Duration,
    /// Wait before each token probe.
    pub token_delay: Duration,
    /// Longer rest taken after every `wallet_rest_every`th completed wallet.
    pub wallet_rest: Duration,
    pub wallet_rest_every: usize,
}

impl Pacing {
    pub fn standard() -> Self {
        Pacing {
            catalog_delay: Duration::from_millis(500),
            native_delay: Duration::from_millis(300),
            token_delay: Duration::from_millis(300),
            wallet_rest: Duration::from_secs(5),
            wallet_rest_every: 3,
        }
    }

    /// No waiting at all, for tests and `--fast` runs.
    pub fn none() -> Self {
        Pacing {
            catalog_delay: Duration::ZERO,
            native_delay: Duration::ZERO,
            token_delay: Duration::ZERO,
            wallet_rest: Duration::ZERO,
            wallet_rest_every: 0,
        }
    }

    pub async fn after_catalog(&self) {
        tokio::time::sleep(self.catalog_delay).await;
    }

    pub async fn before_native(&self) {
        tokio::time::sleep(self.native_delay).await;
    }

    pub async fn before_token(&self) {
        tokio::time::sleep(self.token_delay).await;
    }

    pub async fn after_wallet(&self, completed: usize) {
        if self.rests_after(completed) {
            tokio::time::sleep(self.wallet_rest).await;
        }
    }

    /// Whether the longer rest fires after `completed` wallets are done.
    pub fn rests_after(&self, completed: usize) -> bool {
        self.wallet_rest_every > 0 && completed > 0 && completed % self.wallet_rest_every == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_fires_every_third_wallet() {
        let pacing = Pacing::standard();
        let resting: Vec<usize> = (1..=10).filter(|&n| pacing.rests_after(n)).collect();
        assert_eq!(resting, vec![3, 6, 9]);
    }

    #[test]
    fn disabled_pacing_never_rests() {
        let pacing = Pacing::none();
        assert!((1..=10).all(|n| !pacing.rests_after(n)));
    }
}
