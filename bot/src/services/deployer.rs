//! Deploys the collection contract to every chain in the target list.
//!
//! Failures are recorded per chain and the run keeps going; the result is a
//! persisted summary the mint driver later consumes.

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};

use adapters::models::{CollectionParams, ContractConfig, DeploymentRecord};
use adapters::network::DEPLOY_ALL_TARGETS;
use adapters::{CollectionArtifact, EvmNode};

use crate::store::{success_rate, ChainDeployment, ChainFailure, DeploySummary, DeploymentStore};

const INTER_CHAIN_PAUSE: Duration = Duration::from_secs(3);

pub async fn deploy_to_all_chains(
    private_key: &str,
    params: &CollectionParams,
    artifact_path: &str,
    store: &DeploymentStore,
    chains: Option<Vec<String>>,
) -> Result<DeploySummary> {
    let targets: Vec<String> = chains
        .unwrap_or_else(|| DEPLOY_ALL_TARGETS.iter().map(|c| c.to_string()).collect());
    let artifact = CollectionArtifact::load(artifact_path)?;

    info!("starting deployment to {} chains:", targets.len());
    for (index, network) in targets.iter().enumerate() {
        info!("  {}. {network}", index + 1);
    }

    let mut successful: Vec<ChainDeployment> = Vec::new();
    let mut failed: Vec<ChainFailure> = Vec::new();

    for (index, network) in targets.iter().enumerate() {
        info!("[{}/{}] deploying to {network}...", index + 1, targets.len());
        match deploy_one(network, private_key, params, &artifact, store).await {
            Ok(record) => {
                info!("{network} deployment successful");
                info!("  contract: {}", record.contract_address);
                info!("  tx hash:  {}", record.transaction_hash);
                successful.push(ChainDeployment {
                    network: network.clone(),
                    contract_address: record.contract_address,
                    transaction_hash: record.transaction_hash,
                    mint_price: params.mint_price_eth.clone(),
                });

                if index + 1 < targets.len() {
                    info!(
                        "waiting {}s before the next deployment...",
                        INTER_CHAIN_PAUSE.as_secs()
                    );
                    tokio::time::sleep(INTER_CHAIN_PAUSE).await;
                }
            }
            Err(err) => {
                error!("{network} deployment failed: {err:#}");
                failed.push(ChainFailure {
                    network: network.clone(),
                    contract_address: None,
                    error: err.to_string(),
                });
            }
        }
    }

    info!("deployment summary: {} succeeded, {} failed", successful.len(), failed.len());
    for (index, deployment) in successful.iter().enumerate() {
        info!("  {}. {}: {}", index + 1, deployment.network, deployment.contract_address);
    }
    for (index, failure) in failed.iter().enumerate() {
        info!("  {}. {}: {}", index + 1, failure.network, failure.error);
    }

    let summary = DeploySummary {
        timestamp: Utc::now().to_rfc3339(),
        contract_config: ContractConfig::from_params(params),
        success_rate: success_rate(successful.len(), targets.len()),
        successful,
        failed,
        total_chains: targets.len(),
    };
    let path = store.write_deploy_summary(&summary)?;
    info!("summary saved to {}", path.display());

    Ok(summary)
}

async fn deploy_one(
    network: &str,
    private_key: &str,
    params: &CollectionParams,
    artifact: &CollectionArtifact,
    store: &DeploymentStore,
) -> Result<DeploymentRecord> {
    let mut node = EvmNode::connect(network, private_key).await?;
    let record = node.deploy_collection(params, artifact).await?;
    store.write_record(&record)?;
    Ok(record)
}
