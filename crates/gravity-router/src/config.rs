use alloy::primitives::Address;
use std::env;
use url::Url;

use crate::constants::{
    DEFAULT_HIGH_QUALITY_TOKENS, DEFAULT_MAX_HOPS, DEFAULT_RPC_URL, SEPOLIA_CHAIN_ID,
};

/// Runtime routing configuration. Passed into [`crate::RouteFinder`] and
/// [`crate::OnChainTokenGraph`] rather than read from module constants, so
/// tests can swap the chain side for an in-memory graph.
#[derive(Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// JSON-RPC endpoint for contract reads
    pub rpc_url: String,
    /// Chain the router is deployed on
    pub chain_id: u64,
    /// TokenRouter contract address
    pub router_address: Address,
    /// Token every route must end in
    pub settlement_token: Address,
    /// GravityPayment contract, used for quotes (None = skip quoting)
    pub payment_address: Option<Address>,
    /// Default bound on conversions per route
    pub max_hops: usize,
    /// Intermediate tokens that raise route confidence
    pub high_quality_tokens: Vec<Address>,
}

impl std::fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterConfig")
            .field("rpc_url", &redact_rpc_url(&self.rpc_url))
            .field("chain_id", &self.chain_id)
            .field("router_address", &self.router_address)
            .field("settlement_token", &self.settlement_token)
            .field("payment_address", &self.payment_address)
            .field("max_hops", &self.max_hops)
            .field("high_quality_tokens", &self.high_quality_tokens)
            .finish()
    }
}

impl Default for RouterConfig {
    /// Sepolia with the public RPC. Router and settlement addresses are zero
    /// and must be set before use.
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: SEPOLIA_CHAIN_ID,
            router_address: Address::ZERO,
            settlement_token: Address::ZERO,
            payment_address: None,
            max_hops: DEFAULT_MAX_HOPS,
            high_quality_tokens: DEFAULT_HIGH_QUALITY_TOKENS.to_vec(),
        }
    }
}

impl RouterConfig {
    /// Config for a given router and settlement token, other fields default.
    pub fn new(router_address: Address, settlement_token: Address) -> Self {
        Self {
            router_address,
            settlement_token,
            ..Self::default()
        }
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_high_quality_tokens(mut self, tokens: Vec<Address>) -> Self {
        self.high_quality_tokens = tokens;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // Optional: RPC URL
        let rpc_url = var("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        Url::parse(&rpc_url).map_err(|_| ConfigError::InvalidUrl(redact_rpc_url(&rpc_url)))?;

        // Optional: chain ID
        let chain_id = match var("CHAIN_ID") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "CHAIN_ID",
                value: raw,
            })?,
            None => SEPOLIA_CHAIN_ID,
        };

        // Required: router and settlement token
        let router_address = parse_address(
            &var("TOKEN_ROUTER_ADDRESS")
                .ok_or(ConfigError::MissingRequired("TOKEN_ROUTER_ADDRESS"))?,
        )?;
        let settlement_token = parse_address(
            &var("SETTLEMENT_TOKEN_ADDRESS")
                .ok_or(ConfigError::MissingRequired("SETTLEMENT_TOKEN_ADDRESS"))?,
        )?;

        // Optional: payment contract
        let payment_address = var("GRAVITY_PAYMENT_ADDRESS")
            .map(|raw| parse_address(&raw))
            .transpose()?;

        // Optional: hop bound
        let max_hops = match var("MAX_HOPS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "MAX_HOPS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_MAX_HOPS,
        };

        // Optional: allow-list
        let high_quality_tokens = match var("HIGH_QUALITY_TOKENS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(parse_address)
                .collect::<Result<Vec<_>, _>>()?,
            None => DEFAULT_HIGH_QUALITY_TOKENS.to_vec(),
        };

        if router_address == Address::ZERO {
            tracing::warn!("TOKEN_ROUTER_ADDRESS is the zero address, neighbor lookups will fail");
        }

        Ok(Self {
            rpc_url,
            chain_id,
            router_address,
            settlement_token,
            payment_address,
            max_hops,
            high_quality_tokens,
        })
    }
}

fn parse_address(raw: &str) -> Result<Address, ConfigError> {
    crate::path::parse_token(raw).map_err(|_| ConfigError::InvalidAddress(raw.trim().to_string()))
}

/// Strip path, query and credentials from an RPC URL. Hosted endpoints put
/// API keys there.
pub fn redact_rpc_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => match url.host_str() {
            Some(host) => {
                let redacted =
                    url.path() != "/" || url.query().is_some() || !url.username().is_empty();
                let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
                let suffix = if redacted { "/[REDACTED]" } else { "" };
                format!("{}://{host}{port}{suffix}", url.scheme())
            }
            None => "[REDACTED]".to_string(),
        },
        Err(_) => "[REDACTED]".to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
