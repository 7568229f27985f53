//! Registry of the EVM networks the bot can talk to.
//!
//! Every supported chain is listed here with its canonical public RPC
//! endpoint and chain id. Lookup is tolerant of kebab/snake spellings so
//! `base-sepolia`, `base_sepolia` and `baseSepolia` all resolve to the same
//! entry.

use std::env;

use crate::errors::ChainError;

/// Chains targeted by the multi-chain deploy driver. Testnets and the
/// Infura-gated networks are deployed to individually, not as part of a
/// deploy-all run.
pub const DEPLOY_ALL_TARGETS: [&str; 7] = [
    "base", "optimism", "soneium", "lisk", "unichain", "ink", "mode",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Canonical key, used for deployment file names.
    pub key: String,
    pub display_name: String,
    pub url: String,
    pub chain_id: u64,
}

impl NetworkConfig {
    /// Resolve a network key to its configuration.
    ///
    /// The Ethereum mainnet endpoint goes through Infura, so resolving it
    /// requires `INFURA_API_KEY` in the environment.
    pub fn lookup(key: &str) -> Result<Self, ChainError> {
        let normalized: String = key
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        let (canonical, display_name, url, chain_id) = match normalized.as_str() {
            "base" => ("base", "Base Mainnet", "https://mainnet.base.org".to_string(), 8453),
            "basesepolia" => (
                "baseSepolia",
                "Base Sepolia Testnet",
                "https://sepolia.base.org".to_string(),
                84532,
            ),
            "ethereum" => {
                let infura = env::var("INFURA_API_KEY").map_err(|_| {
                    ChainError::ConnectionError(
                        "INFURA_API_KEY must be set to reach Ethereum mainnet".to_string(),
                    )
                })?;
                (
                    "ethereum",
                    "Ethereum Mainnet",
                    format!("https://mainnet.infura.io/v3/{infura}"),
                    1,
                )
            }
            "polygon" => ("polygon", "Polygon Mainnet", "https://polygon-rpc.com".to_string(), 137),
            "arbitrum" => (
                "arbitrum",
                "Arbitrum One",
                "https://arb1.arbitrum.io/rpc".to_string(),
                42161,
            ),
            "optimism" => (
                "optimism",
                "Optimism Mainnet",
                "https://mainnet.optimism.io".to_string(),
                10,
            ),
            "soneium" => ("soneium", "Soneium Mainnet", "https://rpc.soneium.org".to_string(), 1868),
            "lisk" => ("lisk", "Lisk Mainnet", "https://rpc.api.lisk.com".to_string(), 1135),
            "unichain" => (
                "unichain",
                "Unichain Mainnet",
                "https://unichain-rpc.publicnode.com".to_string(),
                130,
            ),
            "ink" => ("ink", "Ink Mainnet", "https://rpc-gel.inkonchain.com".to_string(), 57073),
            "mode" => ("mode", "Mode Mainnet", "https://mainnet.mode.network".to_string(), 34443),
            _ => return Err(ChainError::UnsupportedNetwork(key.to_string())),
        };

        Ok(Self {
            key: canonical.to_string(),
            display_name: display_name.to_string(),
            url,
            chain_id,
        })
    }

    /// Every key the registry knows about.
    pub fn supported_keys() -> [&'static str; 11] {
        [
            "base",
            "baseSepolia",
            "ethereum",
            "polygon",
            "arbitrum",
            "optimism",
            "soneium",
            "lisk",
            "unichain",
            "ink",
            "mode",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_networks() {
        let base = NetworkConfig::lookup("base").unwrap();
        assert_eq!(base.chain_id, 8453);
        assert_eq!(base.url, "https://mainnet.base.org");

        let soneium = NetworkConfig::lookup("soneium").unwrap();
        assert_eq!(soneium.chain_id, 1868);
    }

    #[test]
    fn lookup_tolerates_spelling_variants() {
        for spelling in ["baseSepolia", "base-sepolia", "base_sepolia", "BASESEPOLIA"] {
            let config = NetworkConfig::lookup(spelling).unwrap();
            assert_eq!(config.key, "baseSepolia");
            assert_eq!(config.chain_id, 84532);
        }
    }

    #[test]
    fn unknown_network_is_an_error() {
        let err = NetworkConfig::lookup("dogechain").unwrap_err();
        assert!(err.to_string().contains("dogechain"));
    }

    #[test]
    fn deploy_targets_are_all_resolvable_mainnets() {
        for key in DEPLOY_ALL_TARGETS {
            let config = NetworkConfig::lookup(key).unwrap();
            assert!(!config.display_name.contains("Testnet"), "{key}");
        }
    }

    #[test]
    fn ethereum_requires_infura_key() {
        env::set_var("INFURA_API_KEY", "test-key");
        let config = NetworkConfig::lookup("ethereum").unwrap();
        assert!(config.url.ends_with("/v3/test-key"));
    }
}
