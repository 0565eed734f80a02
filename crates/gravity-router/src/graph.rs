//! The on-chain token graph the route finder walks.
//!
//! [`TokenGraph`] is the seam: the finder only needs "who can this token
//! convert into" and "is this whole path executable". [`OnChainTokenGraph`]
//! answers both with read calls against the TokenRouter contract.

use alloy::primitives::Address;
use alloy::providers::Provider;

use crate::error::RouteError;
use crate::TokenRouter;

/// Read-only view of the token graph.
///
/// Both calls report failure as an explicit `Err`; the finder decides what a
/// failure means for the search.
pub trait TokenGraph: Send + Sync {
    /// Tokens directly reachable from `token`. May be empty.
    fn neighbors(
        &self,
        token: Address,
    ) -> impl std::future::Future<Output = Result<Vec<Address>, RouteError>> + Send;

    /// Whether the router accepts `path` (at least two tokens) end to end.
    fn validate_path(
        &self,
        path: &[Address],
    ) -> impl std::future::Future<Output = Result<bool, RouteError>> + Send;
}

/// [`TokenGraph`] backed by the TokenRouter contract.
///
/// Each call is a single `eth_call`. Use a plain HTTP provider: batching
/// transports delay individual results.
pub struct OnChainTokenGraph<P> {
    provider: P,
    router_address: Address,
}

impl<P> OnChainTokenGraph<P> {
    pub fn new(provider: P, router_address: Address) -> Self {
        Self {
            provider,
            router_address,
        }
    }

    pub fn router_address(&self) -> Address {
        self.router_address
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P> OnChainTokenGraph<P>
where
    P: Provider + Send + Sync,
{
    /// Check RPC connectivity by fetching the latest block number.
    pub async fn health_check(&self) -> Result<u64, RouteError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| RouteError::Chain(format!("health check failed: {e}")))
    }

    /// Confirm the RPC serves `expected`. Returns the reported chain id.
    pub async fn check_chain_id(&self, expected: u64) -> Result<u64, RouteError> {
        let actual = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| RouteError::Chain(format!("eth_chainId failed: {e}")))?;
        ensure_chain_id(expected, actual)?;
        Ok(actual)
    }
}

/// A router address is only meaningful on the chain it was deployed to.
pub fn ensure_chain_id(expected: u64, actual: u64) -> Result<(), RouteError> {
    if expected == actual {
        Ok(())
    } else {
        Err(RouteError::ChainMismatch { expected, actual })
    }
}

impl<P> TokenGraph for OnChainTokenGraph<P>
where
    P: Provider + Send + Sync,
{
    async fn neighbors(&self, token: Address) -> Result<Vec<Address>, RouteError> {
        let router = TokenRouter::new(self.router_address, &self.provider);
        router
            .getNeighbors(token)
            .call()
            .await
            .map_err(|e| RouteError::Chain(format!("getNeighbors({token:#x}) failed: {e}")))
    }

    async fn validate_path(&self, path: &[Address]) -> Result<bool, RouteError> {
        if path.len() < 2 {
            return Err(RouteError::InvalidPath(format!(
                "validatePath needs at least 2 tokens, got {}",
                path.len()
            )));
        }
        let router = TokenRouter::new(self.router_address, &self.provider);
        router
            .validatePath(path.to_vec())
            .call()
            .await
            .map_err(|e| RouteError::Chain(format!("validatePath failed: {e}")))
    }
}
