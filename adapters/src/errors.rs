//! Custom error types specific to the `adapters` crate.
//!
//! This module defines errors that can occur during chain connection, RPC
//! calls, contract interaction, or transaction submission within the adapter
//! layer, providing a unified error handling mechanism for all EVM
//! interactions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("network {0} is not supported")]
    UnsupportedNetwork(String),
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("wallet error: {0}")]
    WalletError(String),
    #[error("rpc error: {0}")]
    RpcError(String),
    #[error("contract error: {0}")]
    ContractError(String),
    #[error("transaction error: {0}")]
    TransactionError(String),
    #[error("transaction dropped from the mempool before inclusion")]
    TransactionDropped,
    #[error("artifact error: {0}")]
    ArtifactError(String),
    #[error("no collection loaded; deploy or load a contract first")]
    NoCollection,
    #[error("minting is currently disabled by the contract owner")]
    MintingDisabled,
    #[error("max supply reached")]
    SupplyExhausted,
    #[error("insufficient funds: required {required} ETH, available {available} ETH")]
    InsufficientFunds { required: String, available: String },
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
