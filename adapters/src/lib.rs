//! Core `adapters` crate for abstracting EVM chain interactions.
//!
//! This crate owns everything that touches a chain: the network registry,
//! the connected node with its signing middleware, gas and nonce policy,
//! collection contract bindings, and the deploy/mint/maintenance operations
//! the bot builds on.

pub mod contract;
pub mod errors;
pub mod evm;
pub mod gas;
pub mod models;
pub mod network;

pub use contract::CollectionArtifact;
pub use errors::ChainError;
pub use evm::EvmNode;
pub use network::NetworkConfig;
