//! Command-line surface of the bot.
//!
//! One subcommand per operation; flags default from the environment
//! settings so a populated `.env` makes most invocations a single word.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::config::Settings;
use crate::services::{deployer, janitor, minter, verifier};
use crate::store::DeploymentStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deploy and mint NFT collections across EVM chains")]
pub struct Cli {
    /// Directory holding deployment records and run summaries.
    #[arg(long, default_value = "deployments", global = true)]
    pub deployments_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deploy the collection contract to one network
    Deploy {
        #[arg(short, long)]
        network: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        symbol: Option<String>,
        /// Mint price in ETH
        #[arg(long)]
        mint_price: Option<String>,
        #[arg(long)]
        max_supply: Option<u64>,
        #[arg(long)]
        base_uri: Option<String>,
    },
    /// Mint a single NFT against a deployed collection
    Mint {
        #[arg(short, long)]
        network: Option<String>,
        /// Contract address; defaults to the recorded deployment
        #[arg(long)]
        contract: Option<String>,
        /// Recipient address; defaults to RECIPIENT_ADDRESS, then the deployer
        #[arg(long)]
        recipient: Option<String>,
        #[arg(long, default_value = "My Awesome NFT #1")]
        name: String,
        #[arg(long, default_value = "A unique NFT from my collection")]
        description: String,
        #[arg(long, default_value = "https://example.com/image.png")]
        image_url: String,
        /// Embed a random unique id in the metadata
        #[arg(long)]
        unique: bool,
        /// Raw metadata JSON to mint instead of generating a document
        #[arg(long, conflicts_with_all = ["name", "description", "image_url", "unique"])]
        metadata: Option<String>,
        /// Print the cost estimate instead of sending the transaction
        #[arg(long)]
        estimate_only: bool,
    },
    /// Mint a numbered batch of NFTs on one chain
    BatchMint {
        #[arg(short, long)]
        network: Option<String>,
        #[arg(long)]
        contract: Option<String>,
        #[arg(long)]
        recipient: Option<String>,
        #[arg(short, long, default_value_t = 5)]
        count: u64,
        #[arg(long, default_value = "My Awesome NFT")]
        base_name: String,
        #[arg(long, default_value = "A unique NFT from my collection")]
        base_description: String,
        #[arg(long, default_value = "https://example.com/image")]
        base_image_url: String,
        /// Roll a full randomized trait set per token instead of the
        /// edition/rarity/date minimum
        #[arg(long)]
        full_traits: bool,
        /// Delay between mints in milliseconds; defaults to MINT_DELAY_MS
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Show on-chain status for recorded deployments
    Status {
        /// Limit to one network; all recorded deployments otherwise
        #[arg(short, long)]
        network: Option<String>,
    },
    /// Deploy to every chain in the multi-chain target list
    DeployAll {
        /// Comma-separated subset of chains
        #[arg(long)]
        chains: Option<String>,
    },
    /// Batch mint on every successfully deployed chain
    MintAll {
        /// Comma-separated subset of chains
        #[arg(long)]
        chains: Option<String>,
        #[arg(short, long, default_value_t = 250)]
        count: u64,
        #[arg(long)]
        recipient: Option<String>,
        #[arg(long, default_value = "SuperNFT")]
        base_name: String,
        #[arg(long, default_value = "Multi-chain NFT collection")]
        base_description: String,
        #[arg(long, default_value = "https://example.com/images/")]
        base_image_url: String,
        #[arg(long, default_value_t = 3_000)]
        delay_ms: u64,
    },
    /// Replace stuck transactions with a higher-priced self-transfer
    ClearPending {
        #[arg(short, long)]
        network: Option<String>,
    },
    /// Report the signer's latest vs pending nonce
    CheckPending {
        #[arg(short, long)]
        network: Option<String>,
    },
    /// Smoke-test deploy and mint on the default network
    Verify,
    /// Show which environment settings are present
    Config,
}

pub async fn run(cli: Cli, settings: Settings) -> Result<()> {
    let store = DeploymentStore::new(&cli.deployments_dir);

    match cli.command {
        Command::Deploy {
            network,
            name,
            symbol,
            mint_price,
            max_supply,
            base_uri,
        } => {
            let network = network.unwrap_or_else(|| settings.default_network.clone());
            let mut params = settings.collection_params();
            if let Some(name) = name {
                params.name = name;
            }
            if let Some(symbol) = symbol {
                params.symbol = symbol;
            }
            if let Some(mint_price) = mint_price {
                params.mint_price_eth = mint_price;
            }
            if let Some(max_supply) = max_supply {
                params.max_supply = max_supply;
            }
            if let Some(base_uri) = base_uri {
                params.base_uri = base_uri;
            }
            commands::deploy(&settings, &store, &network, &params).await
        }
        Command::Mint {
            network,
            contract,
            recipient,
            name,
            description,
            image_url,
            unique,
            metadata,
            estimate_only,
        } => {
            let args = commands::MintArgs {
                network: network.unwrap_or_else(|| settings.default_network.clone()),
                contract,
                recipient,
                name,
                description,
                image_url,
                unique,
                metadata,
                estimate_only,
            };
            commands::mint(&settings, &store, args).await
        }
        Command::BatchMint {
            network,
            contract,
            recipient,
            count,
            base_name,
            base_description,
            base_image_url,
            full_traits,
            delay_ms,
        } => {
            let args = commands::BatchMintArgs {
                network: network.unwrap_or_else(|| settings.default_network.clone()),
                contract,
                recipient,
                count,
                base_name,
                base_description,
                base_image_url,
                full_traits,
                delay_ms: delay_ms.unwrap_or(settings.mint_delay_ms),
            };
            commands::batch_mint(&settings, &store, args).await
        }
        Command::Status { network } => commands::status(&settings, &store, network).await,
        Command::DeployAll { chains } => {
            let summary = deployer::deploy_to_all_chains(
                settings.private_key()?,
                &settings.collection_params(),
                &settings.artifact_path,
                &store,
                parse_chain_list(chains),
            )
            .await?;
            println!(
                "Deployed to {}/{} chains ({})",
                summary.successful.len(),
                summary.total_chains,
                summary.success_rate
            );
            Ok(())
        }
        Command::MintAll {
            chains,
            count,
            recipient,
            base_name,
            base_description,
            base_image_url,
            delay_ms,
        } => {
            let run = minter::MintRunParams {
                recipient: recipient.or_else(|| settings.recipient.clone()),
                count,
                base_name,
                base_description,
                base_image_url,
                delay_ms,
                chains: parse_chain_list(chains),
            };
            let summary =
                minter::mint_on_deployed_chains(settings.private_key()?, &run, &store).await?;
            println!(
                "Minted {} NFTs across {}/{} chains ({})",
                summary.total_minted,
                summary.successful.len(),
                summary.total_chains,
                summary.success_rate
            );
            Ok(())
        }
        Command::ClearPending { network } => {
            let network = network.unwrap_or_else(|| settings.default_network.clone());
            janitor::clear_pending(&network, settings.private_key()?).await
        }
        Command::CheckPending { network } => {
            let network = network.unwrap_or_else(|| settings.default_network.clone());
            janitor::check_pending(&network, settings.private_key()?).await
        }
        Command::Verify => {
            verifier::run_smoke_test(
                &settings.default_network,
                settings.private_key()?,
                &settings.artifact_path,
                &store,
            )
            .await
        }
        Command::Config => {
            settings.report();
            Ok(())
        }
    }
}

fn parse_chain_list(raw: Option<String>) -> Option<Vec<String>> {
    let list: Vec<String> = raw?
        .split(',')
        .map(|chain| chain.trim().to_string())
        .filter(|chain| !chain.is_empty())
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_lists_split_on_commas_and_trim() {
        let parsed = parse_chain_list(Some("base, optimism ,mode".to_string())).unwrap();
        assert_eq!(parsed, ["base", "optimism", "mode"]);
    }

    #[test]
    fn empty_chain_list_means_all() {
        assert!(parse_chain_list(None).is_none());
        assert!(parse_chain_list(Some(" , ,".to_string())).is_none());
    }

    #[test]
    fn cli_parses_the_documented_subcommands() {
        let cli = Cli::try_parse_from([
            "bot",
            "batch-mint",
            "--network",
            "base",
            "--count",
            "10",
            "--delay-ms",
            "1000",
        ])
        .unwrap();
        match cli.command {
            Command::BatchMint { count, delay_ms, network, .. } => {
                assert_eq!(count, 10);
                assert_eq!(delay_ms, Some(1000));
                assert_eq!(network.as_deref(), Some("base"));
            }
            other => panic!("parsed into {other:?}"),
        }

        let cli = Cli::try_parse_from(["bot", "mint-all", "--chains", "base,mode"]).unwrap();
        match cli.command {
            Command::MintAll { chains, count, .. } => {
                assert_eq!(chains.as_deref(), Some("base,mode"));
                assert_eq!(count, 250);
            }
            other => panic!("parsed into {other:?}"),
        }
    }
}
