use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by routing and payment-helper operations.
///
/// The route finder itself never returns these to its caller: remote failures
/// are downgraded per candidate and a missing route is `None`.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("chain error: {0}")]
    Chain(String),

    #[error("chain id mismatch: configured {expected}, RPC reports {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
