//! Flat-file persistence for deployment records and run summaries.
//!
//! Everything lives under a `deployments/` directory: one JSON file per
//! network plus the multi-chain run summaries. The files double as the
//! hand-off between the deploy and mint drivers, so their field names are
//! part of the tool's external surface.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use adapters::models::{ContractConfig, DeploymentRecord, MintOutcome};

const DEPLOY_SUMMARY_FILE: &str = "all-chains-summary.json";
const MINT_SUMMARY_FILE: &str = "minting-summary.json";

/// Summary of one deploy-all run.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeploySummary {
    pub timestamp: String,
    pub contract_config: ContractConfig,
    pub successful: Vec<ChainDeployment>,
    pub failed: Vec<ChainFailure>,
    pub total_chains: usize,
    pub success_rate: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChainDeployment {
    pub network: String,
    pub contract_address: String,
    pub transaction_hash: String,
    pub mint_price: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChainFailure {
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    pub error: String,
}

/// Summary of one mint-all run.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MintSummary {
    pub timestamp: String,
    pub mint_config: MintRunConfig,
    pub successful: Vec<ChainMintReport>,
    pub failed: Vec<ChainFailure>,
    pub total_chains: usize,
    pub total_minted: usize,
    pub success_rate: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MintRunConfig {
    pub recipient: String,
    pub count: u64,
    pub base_name: String,
    pub base_description: String,
    pub base_image_url: String,
    pub delay_ms: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChainMintReport {
    pub network: String,
    pub contract_address: String,
    pub minted_count: usize,
    pub target_count: u64,
    pub duration_secs: u64,
    pub outcomes: Vec<MintOutcome>,
}

pub struct DeploymentStore {
    root: PathBuf,
}

impl DeploymentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist a per-network deployment record, creating the directory on
    /// first use. Returns the file written.
    pub fn write_record(&self, record: &DeploymentRecord) -> Result<PathBuf> {
        let path = self.root.join(format!("{}.json", record.network));
        self.write_json(&path, record)?;
        Ok(path)
    }

    pub fn read_record(&self, network: &str) -> Result<DeploymentRecord> {
        let path = self.root.join(format!("{network}.json"));
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("no deployment recorded for {network}"))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("corrupt deployment record {}", path.display()))
    }

    /// All per-network records. Files that do not parse as records (the run
    /// summaries share the directory) are skipped.
    pub fn list_records(&self) -> Result<Vec<DeploymentRecord>> {
        let mut records = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return Ok(records),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Ok(raw) = fs::read_to_string(&path) else {
                continue;
            };
            if let Ok(record) = serde_json::from_str::<DeploymentRecord>(&raw) {
                records.push(record);
            }
        }
        records.sort_by(|a, b| a.network.cmp(&b.network));
        Ok(records)
    }

    pub fn write_deploy_summary(&self, summary: &DeploySummary) -> Result<PathBuf> {
        let path = self.root.join(DEPLOY_SUMMARY_FILE);
        self.write_json(&path, summary)?;
        Ok(path)
    }

    pub fn read_deploy_summary(&self) -> Result<DeploySummary> {
        let path = self.root.join(DEPLOY_SUMMARY_FILE);
        let raw = fs::read_to_string(&path)
            .context("deployment summary not found; run deploy-all first")?;
        serde_json::from_str(&raw)
            .with_context(|| format!("corrupt deployment summary {}", path.display()))
    }

    pub fn write_mint_summary(&self, summary: &MintSummary) -> Result<PathBuf> {
        let path = self.root.join(MINT_SUMMARY_FILE);
        self.write_json(&path, summary)?;
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("cannot create {}", self.root.display()))?;
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(path, raw).with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }
}

/// Percentage string for run summaries, one decimal place.
pub fn success_rate(successful: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", successful as f64 * 100.0 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(network: &str) -> DeploymentRecord {
        DeploymentRecord {
            contract_address: "0x9cE9C392E8144ecEA7a26B8661641602ced4Cd85".into(),
            network: network.into(),
            deployer: "0xf83Bd5A68A91EAB280b05C73F79ed83CCfd0311c".into(),
            deployment_time: "2026-08-06T00:00:00+00:00".into(),
            contract_config: ContractConfig {
                name: "Collection".into(),
                symbol: "COLL".into(),
                mint_price: "0.001".into(),
                max_supply: "10000".into(),
                base_uri: "https://example.com/".into(),
            },
            transaction_hash: "0xdead".into(),
            gas_used: "100000".into(),
            gas_price: "1.5".into(),
            nonce: 0,
        }
    }

    #[test]
    fn record_round_trips_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = DeploymentStore::new(dir.path().join("deployments"));

        store.write_record(&sample_record("base")).unwrap();
        let loaded = store.read_record("base").unwrap();
        assert_eq!(loaded.contract_address, "0x9cE9C392E8144ecEA7a26B8661641602ced4Cd85");
        assert_eq!(loaded.contract_config.symbol, "COLL");
    }

    #[test]
    fn list_skips_summaries_and_sorts_by_network() {
        let dir = tempfile::tempdir().unwrap();
        let store = DeploymentStore::new(dir.path());

        store.write_record(&sample_record("optimism")).unwrap();
        store.write_record(&sample_record("base")).unwrap();
        store
            .write_deploy_summary(&DeploySummary {
                timestamp: "now".into(),
                contract_config: sample_record("base").contract_config,
                successful: vec![],
                failed: vec![],
                total_chains: 0,
                success_rate: "0.0%".into(),
            })
            .unwrap();

        let records = store.list_records().unwrap();
        let networks: Vec<_> = records.iter().map(|r| r.network.as_str()).collect();
        assert_eq!(networks, ["base", "optimism"]);
    }

    #[test]
    fn missing_summary_points_at_deploy_all() {
        let dir = tempfile::tempdir().unwrap();
        let store = DeploymentStore::new(dir.path());
        let err = store.read_deploy_summary().unwrap_err();
        assert!(err.to_string().contains("deploy-all"));
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let store = DeploymentStore::new("/definitely/not/a/real/dir");
        assert!(store.list_records().unwrap().is_empty());
    }

    #[test]
    fn success_rate_formats_one_decimal() {
        assert_eq!(success_rate(5, 7), "71.4%");
        assert_eq!(success_rate(0, 0), "0.0%");
        assert_eq!(success_rate(7, 7), "100.0%");
    }
}
