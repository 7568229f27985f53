//! Generic data models for the `adapters` crate.
//!
//! These models define the records exchanged between the chain adapter and
//! the application layer: deployment parameters and receipts, mint outcomes,
//! contract status snapshots, and cost estimates. Field names serialize in
//! the camelCase shape the deployment files on disk use.

use serde::{Deserialize, Serialize};

/// Constructor parameters for a new collection contract.
#[derive(Debug, Clone)]
pub struct CollectionParams {
    pub name: String,
    pub symbol: String,
    /// Decimal ETH string, e.g. `"0.0001"`.
    pub mint_price_eth: String,
    pub max_supply: u64,
    pub base_uri: String,
}

/// Echo of the constructor configuration stored alongside a deployment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContractConfig {
    pub name: String,
    pub symbol: String,
    pub mint_price: String,
    pub max_supply: String,
    #[serde(rename = "baseURI")]
    pub base_uri: String,
}

impl ContractConfig {
    pub fn from_params(params: &CollectionParams) -> Self {
        Self {
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            mint_price: params.mint_price_eth.clone(),
            max_supply: params.max_supply.to_string(),
            base_uri: params.base_uri.clone(),
        }
    }
}

/// Everything worth remembering about one deployment, persisted as
/// `deployments/<network>.json`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub contract_address: String,
    pub network: String,
    pub deployer: String,
    pub deployment_time: String,
    pub contract_config: ContractConfig,
    pub transaction_hash: String,
    pub gas_used: String,
    /// Gwei, as quoted at submission time.
    pub gas_price: String,
    pub nonce: u64,
}

/// Result of a single successful mint.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MintOutcome {
    pub token_id: String,
    pub transaction_hash: String,
    pub gas_used: String,
    pub recipient: String,
}

/// Snapshot of the collection's on-chain state.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContractStatus {
    pub name: String,
    pub symbol: String,
    pub total_supply: u64,
    pub max_supply: u64,
    /// Decimal ETH string.
    pub mint_price: String,
    pub minting_enabled: bool,
    pub owner: String,
    pub contract_address: String,
}

impl ContractStatus {
    pub fn remaining_supply(&self) -> u64 {
        self.max_supply.saturating_sub(self.total_supply)
    }
}

/// Cost estimate for one mint, all human-readable strings.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MintCost {
    pub gas_estimate: String,
    /// Gwei.
    pub gas_price: String,
    /// ETH.
    pub gas_cost: String,
    /// Gas plus mint price, in ETH.
    pub total_cost: String,
}

/// Signer nonce pair used to detect transactions stuck in the mempool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingState {
    pub latest: u64,
    pub pending: u64,
}

impl PendingState {
    pub fn stuck_count(&self) -> u64 {
        self.pending.saturating_sub(self.latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_record_uses_the_on_disk_field_names() {
        let record = DeploymentRecord {
            contract_address: "0xabc".into(),
            network: "base".into(),
            deployer: "0xdef".into(),
            deployment_time: "2026-08-06T00:00:00+00:00".into(),
            contract_config: ContractConfig {
                name: "Collection".into(),
                symbol: "COLL".into(),
                mint_price: "0.001".into(),
                max_supply: "10000".into(),
                base_uri: "https://example.com/".into(),
            },
            transaction_hash: "0x123".into(),
            gas_used: "21000".into(),
            gas_price: "1.5".into(),
            nonce: 7,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["contractAddress"], "0xabc");
        assert_eq!(json["contractConfig"]["baseURI"], "https://example.com/");
        assert_eq!(json["contractConfig"]["mintPrice"], "0.001");
        assert_eq!(json["nonce"], 7);
    }

    #[test]
    fn remaining_supply_never_underflows() {
        let status = ContractStatus {
            name: String::new(),
            symbol: String::new(),
            total_supply: 12,
            max_supply: 10,
            mint_price: String::new(),
            minting_enabled: true,
            owner: String::new(),
            contract_address: String::new(),
        };
        assert_eq!(status.remaining_supply(), 0);
    }

    #[test]
    fn stuck_count_is_the_nonce_gap() {
        assert_eq!(PendingState { latest: 5, pending: 8 }.stuck_count(), 3);
        assert_eq!(PendingState { latest: 5, pending: 5 }.stuck_count(), 0);
    }
}
