//! Token-swap route discovery for Gravity payment links.
//!
//! A payer holds some ERC-20 token; the merchant settles in a single fixed
//! settlement token. This crate finds a conversion path between the two by
//! walking the token graph held by the on-chain TokenRouter contract.
//!
//! # Pieces
//!
//! - **Graph** ([`TokenGraph`], [`OnChainTokenGraph`]): the two read-only
//!   contract calls the search consumes: `getNeighbors` and `validatePath`
//! - **Finder** ([`RouteFinder`]): breadth-first search over path prefixes,
//!   bounded by a hop count, with every candidate confirmed on-chain
//! - **Confidence** ([`calculate_route_confidence`]): advisory route score
//! - **Lookup** ([`RouteLookup`]): runs a search as a task the caller can
//!   abandon
//!
//! # Quick example
//!
//! ```no_run
//! use alloy::providers::RootProvider;
//! use gravity_router::{OnChainTokenGraph, RouteFinder, RouterConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = RouterConfig::from_env().unwrap();
//! let provider: RootProvider = RootProvider::new_http(config.rpc_url.parse().unwrap());
//! let graph = OnChainTokenGraph::new(provider, config.router_address);
//! let finder = RouteFinder::new(graph, &config);
//!
//! let token_in = "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238".parse().unwrap();
//! match finder.find_settlement_route(token_in).await {
//!     Some(path) => println!("route: {path}"),
//!     None => println!("no route"),
//! }
//! # }
//! ```

// Core types
pub mod config;
pub mod constants;
pub mod error;
pub mod path;

// Search
pub mod confidence;
pub mod finder;
pub mod graph;
pub mod lookup;

// Payer flow
pub mod payment;

use alloy::sol;

// On-chain token graph. Nodes are tokens, edges are registered direct
// conversion pairs.
sol! {
    #[sol(rpc)]
    interface TokenRouter {
        function getNeighbors(address token) external view returns (address[] memory);
        function validatePath(address[] calldata path) external view returns (bool);
    }
}

// Payer's input token. Only the metadata read is needed here.
sol! {
    #[sol(rpc)]
    interface ERC20 {
        function decimals() external view returns (uint8);
    }
}

// Payment contract. Only the quote read is used here; `pay` is submitted by
// the wallet layer.
sol! {
    #[sol(rpc)]
    interface GravityPayment {
        function getQuote(address tokenIn, uint256 amountIn, address[] calldata path) external view returns (uint256);
    }
}

// Re-exports
pub use config::{ConfigError, RouterConfig};
pub use constants::*;
pub use error::RouteError;
pub use path::Path;

pub use confidence::{calculate_route_confidence, calculate_route_confidence_with};
pub use finder::{RouteFinder, RouteSearch, SearchStats};
pub use graph::{OnChainTokenGraph, TokenGraph};
pub use lookup::{LookupCanceller, RouteLookup, RouteOutcome};
