/// A supported network.
///
/// The registry is a static compiled table: adding a chain means adding an
/// entry to [`registry`]. Descriptors are never mutated after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDescriptor {
    /// EVM chain ID.
    pub chain_id: u64,
    /// Human-readable chain name (e.g. "ethereum", "base").
    pub name: &'static str,
    /// JSON-RPC endpoint URL.
    pub rpc_url: &'static str,
    /// Native currency symbol (e.g. "ETH").
    pub native_symbol: &'static str,
    /// Native currency decimal precision.
    pub native_decimals: u8,
}

// ── Registry ─────────────────────────────────────────────────────────

static REGISTRY: &[ChainDescriptor] = &[
    ChainDescriptor {
        chain_id: 1,
        name: "ethereum",
        rpc_url: "https://eth.llamarpc.com",
        native_symbol: "ETH",
        native_decimals: 18,
    },
    ChainDescriptor {
        chain_id: 8453,
        name: "base",
        rpc_url: "https://mainnet.base.org",
        native_symbol: "ETH",
        native_decimals: 18,
    },
    ChainDescriptor {
        chain_id: 42161,
        name: "arbitrum",
        rpc_url: "https://arb1.arbitrum.io/rpc",
        native_symbol: "ETH",
        native_decimals: 18,
    },
    ChainDescriptor {
        chain_id: 10,
        name: "optimism",
        rpc_url: "https://mainnet.optimism.io",
        native_symbol: "ETH",
        native_decimals: 18,
    },
    ChainDescriptor {
        chain_id: 5000,
        name: "mantle",
        rpc_url: "https://rpc.mantle.xyz",
        native_symbol: "MNT",
        native_decimals: 18,
    },
];

/// The fixed, ordered set of chains a run probes. Wallet processing visits
/// chains in this order.
pub fn registry() -> &'static [ChainDescriptor] {
    REGISTRY
}

// ── Display ──────────────────────────────────────────────────────────

impl std::fmt::Display for ChainDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ids_are_distinct() {
        let mut ids: Vec<u64> = registry().iter().map(|c| c.chain_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), registry().len());
    }

    #[test]
    fn registry_entries_are_well_formed() {
        for chain in registry() {
            assert!(chain.rpc_url.starts_with("https://"), "{}", chain.name);
            assert!(!chain.native_symbol.is_empty());
            assert_eq!(chain.native_decimals, 18);
        }
    }
}
