//! EVM chain node: connection, deployment, minting, and maintenance.
//!
//! This module is the heart of the adapter layer. An [`EvmNode`] owns one
//! connected network (provider plus signing middleware) and optionally an
//! attached collection contract, and exposes the operations the bot drives:
//! deploy, mint, batch mint, status reads, cost estimation, and
//! stuck-transaction clearing.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ethers::prelude::*;
use ethers::utils::{format_ether, format_units, parse_ether, to_checksum};
use tracing::{info, warn};

use crate::contract::{minted_token_id, CollectionArtifact, NFTCollection};
use crate::errors::ChainError;
use crate::gas::GasManager;
use crate::models::{
    CollectionParams, ContractConfig, ContractStatus, DeploymentRecord, MintCost, MintOutcome,
    PendingState,
};
use crate::network::NetworkConfig;

/// Fixed limit for contract creation transactions.
const DEPLOY_GAS_LIMIT: u64 = 3_500_000;
/// Buffer applied on top of the RPC gas estimate for mints.
const MINT_GAS_BUFFER_PERCENT: u64 = 30;
/// A plain ETH transfer, used when clearing stuck transactions.
const TRANSFER_GAS_LIMIT: u64 = 21_000;

pub type EvmClient = SignerMiddleware<Provider<Http>, LocalWallet>;

pub struct EvmNode {
    network: NetworkConfig,
    provider: Provider<Http>,
    client: Arc<EvmClient>,
    address: Address,
    collection: Option<NFTCollection<EvmClient>>,
}

impl EvmNode {
    /// Connect to a network and report the signer's balance. A zero balance
    /// is a warning, not an error, so read-only commands still work.
    pub async fn connect(network: &str, private_key: &str) -> Result<Self, ChainError> {
        let network = NetworkConfig::lookup(network)?;
        info!("connecting to {}...", network.display_name);

        let provider = Provider::<Http>::try_from(network.url.as_str())
            .map_err(|err| ChainError::ConnectionError(err.to_string()))?;
        let wallet = private_key
            .parse::<LocalWallet>()
            .map_err(|err| ChainError::WalletError(err.to_string()))?
            .with_chain_id(network.chain_id);
        let address = wallet.address();
        let client = Arc::new(SignerMiddleware::new(provider.clone(), wallet));

        let balance = provider
            .get_balance(address, None)
            .await
            .map_err(|err| ChainError::RpcError(err.to_string()))?;
        info!(
            "connected, address {} balance {} ETH",
            to_checksum(&address, None),
            format_ether(balance)
        );
        if balance.is_zero() {
            warn!("balance is 0 ETH, the wallet cannot pay for gas");
        }

        Ok(Self {
            network,
            provider,
            client,
            address,
            collection: None,
        })
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// The signer address.
    pub fn address(&self) -> Address {
        self.address
    }

    fn collection(&self) -> Result<&NFTCollection<EvmClient>, ChainError> {
        self.collection.as_ref().ok_or(ChainError::NoCollection)
    }

    /// Deploy a new collection contract and return the record to persist.
    pub async fn deploy_collection(
        &mut self,
        params: &CollectionParams,
        artifact: &CollectionArtifact,
    ) -> Result<DeploymentRecord, ChainError> {
        info!("preparing deployment of {} ({})", params.name, params.symbol);

        let mint_price_wei = parse_ether(&params.mint_price_eth)
            .map_err(|err| ChainError::InvalidAmount(err.to_string()))?;
        let factory =
            ContractFactory::new(artifact.abi.clone(), artifact.bytecode()?, self.client.clone());

        let nonce = GasManager::pending_nonce(&self.provider, self.address).await?;
        let gas_price = GasManager::submission_price(&self.provider).await;
        let gas_price_gwei = format_units(gas_price, "gwei")
            .map_err(|err| ChainError::InvalidAmount(err.to_string()))?;
        info!("using nonce {nonce}, gas price {gas_price_gwei} gwei");

        let mut deployer = factory
            .deploy((
                params.name.clone(),
                params.symbol.clone(),
                mint_price_wei,
                U256::from(params.max_supply),
                params.base_uri.clone(),
            ))
            .map_err(|err| ChainError::ContractError(err.to_string()))?;
        deployer.tx.set_nonce(nonce);
        deployer.tx.set_gas_price(gas_price);
        deployer.tx.set_gas(DEPLOY_GAS_LIMIT);

        info!("deploying contract...");
        let (contract, receipt) = deployer
            .send_with_receipt()
            .await
            .map_err(|err| ChainError::TransactionError(err.to_string()))?;
        info!("deployed at {}", to_checksum(&contract.address(), None));

        let record = DeploymentRecord {
            contract_address: to_checksum(&contract.address(), None),
            network: self.network.key.clone(),
            deployer: to_checksum(&self.address, None),
            deployment_time: Utc::now().to_rfc3339(),
            contract_config: ContractConfig::from_params(params),
            transaction_hash: format!("{:?}", receipt.transaction_hash),
            gas_used: receipt.gas_used.unwrap_or_default().to_string(),
            gas_price: gas_price_gwei,
            nonce: nonce.as_u64(),
        };

        self.collection = Some(NFTCollection::new(contract.address(), self.client.clone()));
        Ok(record)
    }

    /// Attach to an existing collection and verify it answers `name()`.
    pub async fn load_collection(&mut self, address: Address) -> Result<(), ChainError> {
        info!("loading contract {}...", to_checksum(&address, None));
        let collection = NFTCollection::new(address, self.client.clone());
        let name = collection.name().call().await.map_err(|err| {
            ChainError::ContractError(format!(
                "no collection contract at {}: {err}",
                to_checksum(&address, None)
            ))
        })?;
        info!("contract loaded: {name}");
        self.collection = Some(collection);
        Ok(())
    }

    /// Mint one token to `recipient` with the given metadata document.
    ///
    /// Pre-flight checks mirror the contract's own revert conditions so a
    /// doomed transaction never spends gas: sufficient balance, minting
    /// enabled, supply remaining.
    pub async fn mint(&self, recipient: Address, metadata: &str) -> Result<MintOutcome, ChainError> {
        let collection = self.collection()?;

        let mint_price = collection
            .mint_price()
            .call()
            .await
            .map_err(|err| ChainError::ContractError(err.to_string()))?;
        let next_token_id = collection
            .get_current_token_id()
            .call()
            .await
            .map_err(|err| ChainError::ContractError(err.to_string()))?;
        info!(
            "mint price {} ETH, next token id {next_token_id}",
            format_ether(mint_price)
        );

        let balance = self
            .provider
            .get_balance(self.address, None)
            .await
            .map_err(|err| ChainError::RpcError(err.to_string()))?;
        if balance < mint_price {
            return Err(ChainError::InsufficientFunds {
                required: format_ether(mint_price),
                available: format_ether(balance),
            });
        }
        let minting_enabled = collection
            .minting_enabled()
            .call()
            .await
            .map_err(|err| ChainError::ContractError(err.to_string()))?;
        if !minting_enabled {
            return Err(ChainError::MintingDisabled);
        }
        let max_supply = collection
            .max_supply()
            .call()
            .await
            .map_err(|err| ChainError::ContractError(err.to_string()))?;
        if next_token_id > max_supply {
            return Err(ChainError::SupplyExhausted);
        }

        let call = collection
            .mint(recipient, metadata.to_owned())
            .value(mint_price);
        let gas_estimate = call
            .estimate_gas()
            .await
            .map_err(|err| ChainError::ContractError(format!("gas estimation failed: {err}")))?;
        let gas_limit = gas_estimate * U256::from(100 + MINT_GAS_BUFFER_PERCENT) / U256::from(100);

        let nonce = GasManager::pending_nonce(&self.provider, self.address).await?;
        let gas_price = GasManager::submission_price(&self.provider).await;
        info!(
            "using nonce {nonce}, gas limit {gas_limit}, gas price {} gwei",
            format_units(gas_price, "gwei").unwrap_or_default()
        );

        let call = call.gas(gas_limit).gas_price(gas_price).nonce(nonce);
        let pending = call
            .send()
            .await
            .map_err(|err| ChainError::TransactionError(err.to_string()))?;
        info!("waiting for confirmation of {:?}...", pending.tx_hash());
        let receipt = pending
            .await
            .map_err(|err| ChainError::TransactionError(err.to_string()))?
            .ok_or(ChainError::TransactionDropped)?;

        // The minted id comes from the NFTMinted log; the pre-read id is the
        // fallback when the node omits logs from the receipt.
        let token_id = receipt
            .logs
            .iter()
            .find_map(minted_token_id)
            .unwrap_or(next_token_id);

        Ok(MintOutcome {
            token_id: token_id.to_string(),
            transaction_hash: format!("{:?}", receipt.transaction_hash),
            gas_used: receipt.gas_used.unwrap_or_default().to_string(),
            recipient: to_checksum(&recipient, None),
        })
    }

    /// Mint one token per metadata document, sequentially, pausing `delay`
    /// between submissions so public endpoints do not rate-limit the run.
    /// The first failure aborts the whole batch.
    pub async fn batch_mint(
        &self,
        recipient: Address,
        metadata_docs: &[String],
        delay: Duration,
    ) -> Result<Vec<MintOutcome>, ChainError> {
        let total = metadata_docs.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, doc) in metadata_docs.iter().enumerate() {
            info!("[{}/{total}] minting...", index + 1);
            let outcome = self.mint(recipient, doc).await?;
            info!(
                "[{}/{total}] minted token {} in {}",
                index + 1,
                outcome.token_id,
                outcome.transaction_hash
            );
            outcomes.push(outcome);

            if index + 1 < total && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(outcomes)
    }

    pub async fn contract_status(&self) -> Result<ContractStatus, ChainError> {
        let collection = self.collection()?;
        let contract_err = |err: ContractError<EvmClient>| ChainError::ContractError(err.to_string());

        let name = collection.name().call().await.map_err(contract_err)?;
        let symbol = collection.symbol().call().await.map_err(contract_err)?;
        let total_supply = collection.total_supply().call().await.map_err(contract_err)?;
        let max_supply = collection.max_supply().call().await.map_err(contract_err)?;
        let mint_price = collection.mint_price().call().await.map_err(contract_err)?;
        let minting_enabled = collection
            .minting_enabled()
            .call()
            .await
            .map_err(contract_err)?;
        let owner = collection.owner().call().await.map_err(contract_err)?;

        Ok(ContractStatus {
            name,
            symbol,
            total_supply: total_supply.as_u64(),
            max_supply: max_supply.as_u64(),
            mint_price: format_ether(mint_price),
            minting_enabled,
            owner: to_checksum(&owner, None),
            contract_address: to_checksum(&collection.address(), None),
        })
    }

    /// Estimate what one mint would cost at current prices, without bumping.
    pub async fn estimate_mint_cost(
        &self,
        recipient: Address,
        metadata: &str,
    ) -> Result<MintCost, ChainError> {
        let collection = self.collection()?;

        let mint_price = collection
            .mint_price()
            .call()
            .await
            .map_err(|err| ChainError::ContractError(err.to_string()))?;
        let call = collection
            .mint(recipient, metadata.to_owned())
            .value(mint_price);
        let gas_estimate = call
            .estimate_gas()
            .await
            .map_err(|err| ChainError::ContractError(err.to_string()))?;
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|err| ChainError::RpcError(err.to_string()))?;
        let gas_cost = gas_estimate * gas_price;

        Ok(MintCost {
            gas_estimate: gas_estimate.to_string(),
            gas_price: format_units(gas_price, "gwei")
                .map_err(|err| ChainError::InvalidAmount(err.to_string()))?,
            gas_cost: format_ether(gas_cost),
            total_cost: format_ether(gas_cost + mint_price),
        })
    }

    /// Latest vs pending transaction counts for the signer.
    pub async fn pending_state(&self) -> Result<PendingState, ChainError> {
        let latest = self
            .provider
            .get_transaction_count(self.address, Some(BlockNumber::Latest.into()))
            .await
            .map_err(|err| ChainError::RpcError(err.to_string()))?;
        let pending = self
            .provider
            .get_transaction_count(self.address, Some(BlockNumber::Pending.into()))
            .await
            .map_err(|err| ChainError::RpcError(err.to_string()))?;
        Ok(PendingState {
            latest: latest.as_u64(),
            pending: pending.as_u64(),
        })
    }

    /// Replace whatever is stuck in the mempool with a zero-value
    /// self-transfer at the stuck nonce and a strongly bumped gas price.
    /// Returns the refreshed nonce state, or `None` when nothing was
    /// pending.
    pub async fn clear_pending(&self) -> Result<Option<PendingState>, ChainError> {
        let state = self.pending_state().await?;
        info!(
            "current nonce {}, pending nonce {}",
            state.latest, state.pending
        );
        if state.stuck_count() == 0 {
            info!("no pending transactions found");
            return Ok(None);
        }
        warn!("found {} pending transaction(s)", state.stuck_count());

        let gas_price = GasManager::clearing_price(&self.provider).await;
        info!(
            "sending replacement at {} gwei",
            format_units(gas_price, "gwei").unwrap_or_default()
        );

        let tx = TransactionRequest::pay(self.address, 0u64)
            .from(self.address)
            .gas(TRANSFER_GAS_LIMIT)
            .gas_price(gas_price)
            .nonce(state.latest);
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|err| ChainError::TransactionError(err.to_string()))?;
        info!("replacement tx {:?}, waiting for confirmation...", pending.tx_hash());

        let receipt = pending
            .await
            .map_err(|err| ChainError::TransactionError(err.to_string()))?
            .ok_or(ChainError::TransactionDropped)?;
        if receipt.status != Some(U64::from(1)) {
            return Err(ChainError::TransactionError(
                "replacement transaction reverted".to_string(),
            ));
        }

        let refreshed = self.pending_state().await?;
        info!(
            "pending transactions cleared, nonce now {}/{}",
            refreshed.latest, refreshed.pending
        );
        Ok(Some(refreshed))
    }
}
