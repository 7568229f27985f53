//! Environment-driven settings for the bot.
//!
//! Everything comes from the process environment (after `.env` loading in
//! `main`). The private key is optional at startup so read-only commands
//! like `config` work without it; on-chain commands fail with a pointed
//! message instead.

use std::env;

use adapters::models::CollectionParams;
use anyhow::{Context, Result};

pub const DEFAULT_NETWORK: &str = "baseSepolia";
const DEFAULT_NFT_NAME: &str = "My Awesome NFT Collection";
const DEFAULT_NFT_SYMBOL: &str = "MANC";
const DEFAULT_MINT_PRICE: &str = "0.0000001";
const DEFAULT_MAX_SUPPLY: u64 = 1_000_000;
const DEFAULT_BASE_URI: &str = "https://api.example.com/metadata/";
const DEFAULT_MINT_DELAY_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct Settings {
    private_key: Option<String>,
    pub default_network: String,
    pub recipient: Option<String>,
    pub nft_name: String,
    pub nft_symbol: String,
    pub mint_price: String,
    pub max_supply: u64,
    pub base_uri: String,
    pub mint_delay_ms: u64,
    pub artifact_path: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            private_key: var("PRIVATE_KEY"),
            default_network: var("DEFAULT_NETWORK").unwrap_or_else(|| DEFAULT_NETWORK.to_string()),
            recipient: var("RECIPIENT_ADDRESS"),
            nft_name: var("NFT_NAME").unwrap_or_else(|| DEFAULT_NFT_NAME.to_string()),
            nft_symbol: var("NFT_SYMBOL").unwrap_or_else(|| DEFAULT_NFT_SYMBOL.to_string()),
            mint_price: var("MINT_PRICE").unwrap_or_else(|| DEFAULT_MINT_PRICE.to_string()),
            max_supply: var("MAX_SUPPLY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_SUPPLY),
            base_uri: var("NFT_BASE_URI").unwrap_or_else(|| DEFAULT_BASE_URI.to_string()),
            mint_delay_ms: var("MINT_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MINT_DELAY_MS),
            artifact_path: var("CONTRACT_ARTIFACT")
                .unwrap_or_else(|| adapters::contract::DEFAULT_ARTIFACT_PATH.to_string()),
        }
    }

    pub fn private_key(&self) -> Result<&str> {
        self.private_key
            .as_deref()
            .context("PRIVATE_KEY is not set; add it to .env or the environment")
    }

    /// Collection constructor parameters from the environment defaults.
    pub fn collection_params(&self) -> CollectionParams {
        CollectionParams {
            name: self.nft_name.clone(),
            symbol: self.nft_symbol.clone(),
            mint_price_eth: self.mint_price.clone(),
            max_supply: self.max_supply,
            base_uri: self.base_uri.clone(),
        }
    }

    /// Print which settings are present. Secrets are reported as set or not
    /// set, never echoed.
    pub fn report(&self) {
        println!("Environment configuration:");
        println!(
            "  PRIVATE_KEY:       {}",
            if self.private_key.is_some() { "set" } else { "not set" }
        );
        println!("  DEFAULT_NETWORK:   {}", self.default_network);
        println!(
            "  RECIPIENT_ADDRESS: {}",
            self.recipient.as_deref().unwrap_or("not set")
        );
        println!("  NFT_NAME:          {}", self.nft_name);
        println!("  NFT_SYMBOL:        {}", self.nft_symbol);
        println!("  MINT_PRICE:        {} ETH", self.mint_price);
        println!("  MAX_SUPPLY:        {}", self.max_supply);
        println!("  NFT_BASE_URI:      {}", self.base_uri);
        println!("  MINT_DELAY_MS:     {}", self.mint_delay_ms);
        println!("  CONTRACT_ARTIFACT: {}", self.artifact_path);
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_private_key_is_a_pointed_error() {
        let settings = Settings {
            private_key: None,
            default_network: DEFAULT_NETWORK.to_string(),
            recipient: None,
            nft_name: DEFAULT_NFT_NAME.to_string(),
            nft_symbol: DEFAULT_NFT_SYMBOL.to_string(),
            mint_price: DEFAULT_MINT_PRICE.to_string(),
            max_supply: DEFAULT_MAX_SUPPLY,
            base_uri: DEFAULT_BASE_URI.to_string(),
            mint_delay_ms: DEFAULT_MINT_DELAY_MS,
            artifact_path: adapters::contract::DEFAULT_ARTIFACT_PATH.to_string(),
        };
        let err = settings.private_key().unwrap_err();
        assert!(err.to_string().contains("PRIVATE_KEY"));
    }

    #[test]
    fn collection_params_carry_the_env_defaults() {
        let settings = Settings {
            private_key: Some("0xkey".to_string()),
            default_network: DEFAULT_NETWORK.to_string(),
            recipient: None,
            nft_name: "Collection".to_string(),
            nft_symbol: "COLL".to_string(),
            mint_price: "0.001".to_string(),
            max_supply: 500,
            base_uri: "https://example.com/".to_string(),
            mint_delay_ms: 1_000,
            artifact_path: "artifact.json".to_string(),
        };
        let params = settings.collection_params();
        assert_eq!(params.symbol, "COLL");
        assert_eq!(params.max_supply, 500);
        assert_eq!(params.mint_price_eth, "0.001");
    }
}
