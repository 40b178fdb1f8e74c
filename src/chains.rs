/// Static description of an EVM network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain {
    pub id: u64,
    pub name: &'static str,
    pub default_rpc_url: &'static str,
}

pub const MAINNET: Chain = Chain {
    id: 1,
    name: "Ethereum",
    default_rpc_url: "https://eth.merkle.io",
};

pub const BASE: Chain = Chain {
    id: 8453,
    name: "Base",
    default_rpc_url: "https://mainnet.base.org",
};

pub const ARBITRUM: Chain = Chain {
    id: 42161,
    name: "Arbitrum One",
    default_rpc_url: "https://arb1.arbitrum.io/rpc",
};

pub const POLYGON: Chain = Chain {
    id: 137,
    name: "Polygon",
    default_rpc_url: "https://polygon-rpc.com",
};

pub const OPTIMISM: Chain = Chain {
    id: 10,
    name: "OP Mainnet",
    default_rpc_url: "https://mainnet.optimism.io",
};

pub const MODE: Chain = Chain {
    id: 34443,
    name: "Mode Mainnet",
    default_rpc_url: "https://mainnet.mode.network",
};

pub const SEPOLIA: Chain = Chain {
    id: 11155111,
    name: "Sepolia",
    default_rpc_url: "https://rpc.sepolia.org",
};

/// Chains the RPC tools operate on, in fan-out order.
pub const SUPPORTED_CHAINS: &[Chain] = &[MAINNET, BASE, ARBITRUM, POLYGON, OPTIMISM, MODE, SEPOLIA];

pub fn by_id(id: u64) -> Option<&'static Chain> {
    SUPPORTED_CHAINS.iter().find(|chain| chain.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids_are_unique() {
        for (i, a) in SUPPORTED_CHAINS.iter().enumerate() {
            for b in &SUPPORTED_CHAINS[i + 1..] {
                assert_ne!(a.id, b.id, "{} and {} share an id", a.name, b.name);
            }
        }
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(by_id(10).map(|c| c.name), Some("OP Mainnet"));
        assert!(by_id(56).is_none());
    }
}
