use alloy::primitives::{address, Address};

/// Sepolia chain ID.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Public Sepolia RPC endpoint, used when `RPC_URL` is unset.
pub const DEFAULT_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";

/// Default bound on conversions in a route.
pub const DEFAULT_MAX_HOPS: usize = 3;

/// USDC on Sepolia.
pub const USDC_SEPOLIA: Address = address!("0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238");

/// Intermediate tokens that earn a confidence bonus by default.
pub const DEFAULT_HIGH_QUALITY_TOKENS: &[Address] = &[USDC_SEPOLIA];

/// Minimum output slippage tolerance applied to quotes, in basis points (5%).
pub const DEFAULT_SLIPPAGE_BPS: u16 = 500;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u16 = 10_000;
