//! Handlers behind the single-chain CLI subcommands.
//!
//! Progress goes through `tracing`; final results the user asked for are
//! printed plainly.

use anyhow::{Context, Result};
use ethers::types::Address;
use tracing::info;

use adapters::models::CollectionParams;
use adapters::{CollectionArtifact, EvmNode};

use crate::config::Settings;
use crate::metadata::MetadataGenerator;
use crate::store::DeploymentStore;

pub struct MintArgs {
    pub network: String,
    pub contract: Option<String>,
    pub recipient: Option<String>,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub unique: bool,
    pub metadata: Option<String>,
    pub estimate_only: bool,
}

pub struct BatchMintArgs {
    pub network: String,
    pub contract: Option<String>,
    pub recipient: Option<String>,
    pub count: u64,
    pub base_name: String,
    pub base_description: String,
    pub base_image_url: String,
    pub full_traits: bool,
    pub delay_ms: u64,
}

pub async fn deploy(
    settings: &Settings,
    store: &DeploymentStore,
    network: &str,
    params: &CollectionParams,
) -> Result<()> {
    let mut node = EvmNode::connect(network, settings.private_key()?).await?;
    let artifact = CollectionArtifact::load(&settings.artifact_path)?;
    let record = node.deploy_collection(params, &artifact).await?;
    let path = store.write_record(&record)?;
    info!("deployment recorded at {}", path.display());

    println!("Contract deployed!");
    println!("  address:    {}", record.contract_address);
    println!("  network:    {}", record.network);
    println!("  mint price: {} ETH", record.contract_config.mint_price);
    println!("  tx hash:    {}", record.transaction_hash);
    Ok(())
}

pub async fn mint(settings: &Settings, store: &DeploymentStore, args: MintArgs) -> Result<()> {
    let (node, default_recipient) =
        attach(settings, store, &args.network, args.contract.as_deref()).await?;

    let recipient = resolve_recipient(
        args.recipient.as_deref(),
        settings.recipient.as_deref(),
        default_recipient,
    )?;

    let doc = match &args.metadata {
        // Caller-supplied documents are validated before they go on-chain.
        Some(raw) => crate::metadata::validate(raw)?.to_json(),
        None => {
            let generator = MetadataGenerator::new();
            let metadata = if args.unique {
                generator.generate_unique(&args.name, &args.description, &args.image_url)
            } else {
                generator.generate(&args.name, &args.description, &args.image_url, &[])
            };
            metadata.to_json()
        }
    };

    if args.estimate_only {
        let cost = node.estimate_mint_cost(recipient, &doc).await?;
        println!("Mint cost estimate:");
        println!("  gas estimate: {}", cost.gas_estimate);
        println!("  gas price:    {} gwei", cost.gas_price);
        println!("  gas cost:     {} ETH", cost.gas_cost);
        println!("  total cost:   {} ETH", cost.total_cost);
        return Ok(());
    }

    let outcome = node.mint(recipient, &doc).await?;
    println!("NFT minted!");
    println!("  token id: {}", outcome.token_id);
    println!("  tx hash:  {}", outcome.transaction_hash);
    println!("  gas used: {}", outcome.gas_used);
    Ok(())
}

pub async fn batch_mint(
    settings: &Settings,
    store: &DeploymentStore,
    args: BatchMintArgs,
) -> Result<()> {
    let (node, default_recipient) =
        attach(settings, store, &args.network, args.contract.as_deref()).await?;

    let recipient = resolve_recipient(
        args.recipient.as_deref(),
        settings.recipient.as_deref(),
        default_recipient,
    )?;

    let generator = MetadataGenerator::new();
    let series = if args.full_traits {
        generator.collection_series(
            args.count,
            &args.base_name,
            &args.base_description,
            &args.base_image_url,
        )
    } else {
        generator.mint_series(
            args.count,
            &args.base_name,
            &args.base_description,
            &args.base_image_url,
        )
    };
    let docs: Vec<String> = series.iter().map(|metadata| metadata.to_json()).collect();

    let outcomes = node
        .batch_mint(
            recipient,
            &docs,
            std::time::Duration::from_millis(args.delay_ms),
        )
        .await?;

    println!("Minted {} NFTs!", outcomes.len());
    for (index, outcome) in outcomes.iter().enumerate() {
        println!(
            "  {}. token {} - tx {}",
            index + 1,
            outcome.token_id,
            outcome.transaction_hash
        );
    }
    Ok(())
}

pub async fn status(
    settings: &Settings,
    store: &DeploymentStore,
    network: Option<String>,
) -> Result<()> {
    let records = match network {
        Some(network) => vec![store.read_record(&canonical_key(&network)?)?],
        None => store.list_records()?,
    };
    if records.is_empty() {
        println!("No deployments recorded yet.");
        return Ok(());
    }

    for record in records {
        let (node, _) = attach(
            settings,
            store,
            &record.network,
            Some(record.contract_address.as_str()),
        )
        .await?;
        let status = node.contract_status().await?;

        println!("\n{} ({})", status.name, record.network);
        println!("  address:         {}", status.contract_address);
        println!("  total supply:    {}/{}", status.total_supply, status.max_supply);
        println!("  mint price:      {} ETH", status.mint_price);
        println!(
            "  minting enabled: {}",
            if status.minting_enabled { "yes" } else { "no" }
        );
        println!("  owner:           {}", status.owner);
    }
    Ok(())
}

/// Connect to `network` and attach the collection, either at an explicit
/// address or from the recorded deployment. The second return value is the
/// fallback recipient: the recorded deployer when one exists, else the
/// signer.
async fn attach(
    settings: &Settings,
    store: &DeploymentStore,
    network: &str,
    contract: Option<&str>,
) -> Result<(EvmNode, Address)> {
    let mut node = EvmNode::connect(network, settings.private_key()?).await?;

    let (address, fallback) = match contract {
        Some(raw) => (
            raw.parse::<Address>().context("invalid contract address")?,
            node.address(),
        ),
        None => {
            let record = store.read_record(&node.network().key)?;
            let address = record
                .contract_address
                .parse::<Address>()
                .context("corrupt contract address in deployment record")?;
            let deployer = record.deployer.parse::<Address>().unwrap_or(node.address());
            (address, deployer)
        }
    };

    node.load_collection(address).await?;
    Ok((node, fallback))
}

fn resolve_recipient(
    flag: Option<&str>,
    env: Option<&str>,
    fallback: Address,
) -> Result<Address> {
    match flag.or(env) {
        Some(raw) => raw.parse().context("invalid recipient address"),
        None => Ok(fallback),
    }
}

fn canonical_key(network: &str) -> Result<String> {
    Ok(adapters::NetworkConfig::lookup(network)?.key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_resolution_prefers_flag_then_env_then_fallback() {
        let fallback = Address::zero();
        let flag = "0xf83Bd5A68A91EAB280b05C73F79ed83CCfd0311c";
        let env = "0x306DcB1f61185E0703B416995887266F3ba5B770";

        let from_flag = resolve_recipient(Some(flag), Some(env), fallback).unwrap();
        assert_eq!(from_flag, flag.parse().unwrap());

        let from_env = resolve_recipient(None, Some(env), fallback).unwrap();
        assert_eq!(from_env, env.parse().unwrap());

        assert_eq!(resolve_recipient(None, None, fallback).unwrap(), fallback);
    }

    #[test]
    fn bad_recipient_is_reported_as_such() {
        let err = resolve_recipient(Some("not-an-address"), None, Address::zero()).unwrap_err();
        assert!(err.to_string().contains("recipient"));
    }
}
