//! Fee and nonce policy for transaction submission.
//!
//! Public RPC endpoints are shared and slow to evict stuck transactions, so
//! every submission bumps the quoted gas price and pins an explicit nonce
//! read from the pending block. Clearing mode bumps harder, enough to
//! replace whatever is stuck in the mempool.

use ethers::prelude::*;
use tracing::warn;

use crate::errors::ChainError;

/// Bump over the quoted price for regular submissions.
pub const SUBMIT_BUMP_PERCENT: u64 = 50;
/// Bump used when replacing a stuck transaction.
pub const CLEAR_BUMP_PERCENT: u64 = 100;

const FALLBACK_SUBMIT_GWEI: u64 = 2;
const FALLBACK_CLEAR_GWEI: u64 = 5;

pub struct GasManager;

impl GasManager {
    /// Gas price for a regular submission: quoted price plus
    /// [`SUBMIT_BUMP_PERCENT`], or a flat fallback when the endpoint does
    /// not quote one.
    pub async fn submission_price<M: Middleware>(provider: &M) -> U256 {
        Self::quote(provider, SUBMIT_BUMP_PERCENT, FALLBACK_SUBMIT_GWEI).await
    }

    /// Gas price aggressive enough to replace a pending transaction.
    pub async fn clearing_price<M: Middleware>(provider: &M) -> U256 {
        Self::quote(provider, CLEAR_BUMP_PERCENT, FALLBACK_CLEAR_GWEI).await
    }

    /// Next usable nonce for `address`, including transactions still in the
    /// mempool.
    pub async fn pending_nonce<M: Middleware>(
        provider: &M,
        address: Address,
    ) -> Result<U256, ChainError> {
        provider
            .get_transaction_count(address, Some(BlockNumber::Pending.into()))
            .await
            .map_err(|err| ChainError::RpcError(err.to_string()))
    }

    async fn quote<M: Middleware>(provider: &M, bump_percent: u64, fallback_gwei: u64) -> U256 {
        match provider.get_gas_price().await {
            Ok(price) => bumped(price, bump_percent),
            Err(err) => {
                warn!("gas price unavailable ({err}), falling back to {fallback_gwei} gwei");
                gwei(fallback_gwei)
            }
        }
    }
}

fn bumped(price: U256, percent: u64) -> U256 {
    price * U256::from(100 + percent) / U256::from(100)
}

fn gwei(amount: u64) -> U256 {
    U256::from(amount) * U256::exp10(9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_is_integer_percentage_math() {
        assert_eq!(bumped(U256::from(100), 50), U256::from(150));
        assert_eq!(bumped(U256::from(100), 100), U256::from(200));
        // Truncation matches on-chain integer division.
        assert_eq!(bumped(U256::from(3), 50), U256::from(4));
    }

    #[test]
    fn fallbacks_are_denominated_in_gwei() {
        assert_eq!(gwei(2), U256::from(2_000_000_000u64));
        assert_eq!(gwei(5), U256::from(5_000_000_000u64));
    }
}
