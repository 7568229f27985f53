//! Mempool maintenance for one network.
//!
//! No automatic retry exists anywhere in the bot; when a transaction gets
//! stuck the operator runs these passes by hand.

use anyhow::Result;
use tracing::{info, warn};

use adapters::EvmNode;

pub async fn check_pending(network: &str, private_key: &str) -> Result<()> {
    let node = EvmNode::connect(network, private_key).await?;
    let state = node.pending_state().await?;
    info!("current nonce {}, pending nonce {}", state.latest, state.pending);
    if state.stuck_count() == 0 {
        info!("no pending transactions");
    } else {
        warn!("{} pending transaction(s) found", state.stuck_count());
    }
    Ok(())
}

pub async fn clear_pending(network: &str, private_key: &str) -> Result<()> {
    info!("clearing pending transactions on {network}...");
    let node = EvmNode::connect(network, private_key).await?;
    node.clear_pending().await?;
    Ok(())
}
