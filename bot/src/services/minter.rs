//! Batched minting against every recorded deployment.
//!
//! Reads the deploy-all summary, clamps each chain's target to remaining
//! supply, and keeps going past per-chain failures. The per-chain outcomes
//! land in `deployments/minting-summary.json`.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use ethers::types::Address;
use tracing::{error, info, warn};

use adapters::EvmNode;

use crate::metadata::MetadataGenerator;
use crate::store::{
    success_rate, ChainDeployment, ChainFailure, ChainMintReport, DeploymentStore, MintRunConfig,
    MintSummary,
};

const INTER_CHAIN_PAUSE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct MintRunParams {
    /// Defaults to the signer address when absent.
    pub recipient: Option<String>,
    pub count: u64,
    pub base_name: String,
    pub base_description: String,
    pub base_image_url: String,
    pub delay_ms: u64,
    /// Restrict the run to these chains; `None` mints everywhere.
    pub chains: Option<Vec<String>>,
}

pub async fn mint_on_deployed_chains(
    private_key: &str,
    run: &MintRunParams,
    store: &DeploymentStore,
) -> Result<MintSummary> {
    let deploy_summary = store.read_deploy_summary()?;
    let mut targets = deploy_summary.successful;
    if targets.is_empty() {
        bail!("no successful deployments found; deploy contracts first");
    }
    if let Some(chains) = &run.chains {
        targets.retain(|deployment| {
            chains
                .iter()
                .any(|chain| chain.eq_ignore_ascii_case(&deployment.network))
        });
        if targets.is_empty() {
            bail!("no matching deployments found for the requested chains");
        }
    }

    info!("will mint {} NFTs on {} chains:", run.count, targets.len());
    for (index, deployment) in targets.iter().enumerate() {
        info!("  {}. {}: {}", index + 1, deployment.network, deployment.contract_address);
    }

    let generator = MetadataGenerator::new();
    let mut successful: Vec<ChainMintReport> = Vec::new();
    let mut failed: Vec<ChainFailure> = Vec::new();

    for (index, deployment) in targets.iter().enumerate() {
        info!(
            "[{}/{}] minting on {}...",
            index + 1,
            targets.len(),
            deployment.network
        );
        match mint_on_chain(private_key, run, &generator, deployment).await {
            Ok(Some(report)) => {
                info!(
                    "{} minting completed: {}/{} NFTs in {}s",
                    deployment.network, report.minted_count, report.target_count, report.duration_secs
                );
                successful.push(report);

                if index + 1 < targets.len() {
                    info!(
                        "waiting {}s before the next chain...",
                        INTER_CHAIN_PAUSE.as_secs()
                    );
                    tokio::time::sleep(INTER_CHAIN_PAUSE).await;
                }
            }
            Ok(None) => {
                warn!("{}: max supply reached, skipping", deployment.network);
                failed.push(ChainFailure {
                    network: deployment.network.clone(),
                    contract_address: Some(deployment.contract_address.clone()),
                    error: "max supply reached".to_string(),
                });
            }
            Err(err) => {
                error!("{} minting failed: {err:#}", deployment.network);
                failed.push(ChainFailure {
                    network: deployment.network.clone(),
                    contract_address: Some(deployment.contract_address.clone()),
                    error: err.to_string(),
                });
            }
        }
    }

    let total_minted: usize = successful.iter().map(|report| report.minted_count).sum();
    info!(
        "minting summary: {} chains succeeded, {} failed, {} NFTs minted",
        successful.len(),
        failed.len(),
        total_minted
    );
    for (index, report) in successful.iter().enumerate() {
        info!(
            "  {}. {}: {}/{} NFTs ({}s)",
            index + 1,
            report.network,
            report.minted_count,
            report.target_count,
            report.duration_secs
        );
    }
    for (index, failure) in failed.iter().enumerate() {
        info!("  {}. {}: {}", index + 1, failure.network, failure.error);
    }

    let summary = MintSummary {
        timestamp: Utc::now().to_rfc3339(),
        mint_config: MintRunConfig {
            recipient: run
                .recipient
                .clone()
                .unwrap_or_else(|| "signer".to_string()),
            count: run.count,
            base_name: run.base_name.clone(),
            base_description: run.base_description.clone(),
            base_image_url: run.base_image_url.clone(),
            delay_ms: run.delay_ms,
        },
        success_rate: success_rate(successful.len(), targets.len()),
        total_chains: targets.len(),
        total_minted,
        successful,
        failed,
    };
    let path = store.write_mint_summary(&summary)?;
    info!("minting summary saved to {}", path.display());

    Ok(summary)
}

/// Mint on one chain. Returns `None` when the collection has no supply
/// left, which the caller records as a skip rather than an error.
async fn mint_on_chain(
    private_key: &str,
    run: &MintRunParams,
    generator: &MetadataGenerator,
    deployment: &ChainDeployment,
) -> Result<Option<ChainMintReport>> {
    let mut node = EvmNode::connect(&deployment.network, private_key).await?;
    let contract: Address = deployment
        .contract_address
        .parse()
        .context("invalid contract address in deployment summary")?;
    node.load_collection(contract).await?;

    let status = node.contract_status().await?;
    info!("  current supply: {}/{}", status.total_supply, status.max_supply);
    info!("  mint price: {} ETH", status.mint_price);

    let remaining = status.remaining_supply();
    if remaining == 0 {
        return Ok(None);
    }
    let target = run.count.min(remaining);
    if target < run.count {
        warn!(
            "{}: only {target} NFTs can be minted (supply limit)",
            deployment.network
        );
    }

    let recipient: Address = match &run.recipient {
        Some(address) => address.parse().context("invalid recipient address")?,
        None => node.address(),
    };

    let docs: Vec<String> = generator
        .mint_series(
            target,
            &format!("{} [{}]", run.base_name, deployment.network.to_uppercase()),
            &format!("{} - Minted on {}", run.base_description, deployment.network),
            &format!("{}{}/", run.base_image_url, deployment.network),
        )
        .iter()
        .map(|metadata| metadata.to_json())
        .collect();

    let started = Instant::now();
    let outcomes = node
        .batch_mint(recipient, &docs, Duration::from_millis(run.delay_ms))
        .await?;
    let duration_secs = started.elapsed().as_secs();

    Ok(Some(ChainMintReport {
        network: deployment.network.clone(),
        contract_address: deployment.contract_address.clone(),
        minted_count: outcomes.len(),
        target_count: run.count,
        duration_secs,
        outcomes,
    }))
}
