//! End-to-end smoke test: deploy, mint, batch mint, status.
//!
//! Meant to run against the default testnet before committing to a
//! multi-chain mainnet run.

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use adapters::models::CollectionParams;
use adapters::{CollectionArtifact, EvmNode};

use crate::metadata::MetadataGenerator;
use crate::store::DeploymentStore;

const BATCH_SIZE: u64 = 5;
const BATCH_DELAY: Duration = Duration::from_secs(1);

pub async fn run_smoke_test(
    network: &str,
    private_key: &str,
    artifact_path: &str,
    store: &DeploymentStore,
) -> Result<()> {
    info!("testing deployment and minting on {network}...");

    info!("1. deploying test collection...");
    let mut node = EvmNode::connect(network, private_key).await?;
    let artifact = CollectionArtifact::load(artifact_path)?;
    let params = CollectionParams {
        name: "Test Collection".to_string(),
        symbol: "TESTC".to_string(),
        mint_price_eth: "0.001".to_string(),
        max_supply: 100,
        base_uri: "https://test.example.com/metadata/".to_string(),
    };
    let record = node.deploy_collection(&params, &artifact).await?;
    store.write_record(&record)?;
    info!("   contract: {}", record.contract_address);

    info!("2. single mint...");
    let generator = MetadataGenerator::new();
    let metadata = generator.generate(
        "Test NFT #1",
        "Deployment verification",
        "https://test.example.com/images/1.png",
        &[],
    );
    let outcome = node.mint(node.address(), &metadata.to_json()).await?;
    info!("   token {} in {}", outcome.token_id, outcome.transaction_hash);

    info!("3. batch mint ({BATCH_SIZE} NFTs)...");
    let docs: Vec<String> = generator
        .mint_series(
            BATCH_SIZE,
            "Test Batch NFT",
            "Batch verification",
            "https://test.example.com/images/batch/",
        )
        .iter()
        .map(|m| m.to_json())
        .collect();
    let outcomes = node
        .batch_mint(node.address(), &docs, BATCH_DELAY)
        .await?;
    info!("   minted {} NFTs", outcomes.len());

    info!("4. contract status...");
    let status = node.contract_status().await?;
    info!(
        "   {} ({}), supply {}/{}, mint price {} ETH",
        status.name, status.symbol, status.total_supply, status.max_supply, status.mint_price
    );

    info!("all checks passed, ready for a multi-chain run");
    Ok(())
}
