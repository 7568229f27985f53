//! Multi-chain driver services.
//!
//! Each module here sequences one long-running operation across chains:
//! deployment fan-out, batched minting against recorded deployments, and
//! mempool maintenance. Runs are strictly sequential with fixed pauses
//! between networks so shared public endpoints do not rate-limit the bot.

pub mod deployer;
pub mod janitor;
pub mod minter;
pub mod verifier;
