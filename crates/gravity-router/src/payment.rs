//! Pieces of the payer flow that sit on top of a discovered route: turning
//! the typed amount into token units, deriving the on-chain event id, quoting
//! with slippage protection, and deciding whether "Pay" can be pressed.
//!
//! Submitting the payment itself belongs to the wallet layer.

use alloy::primitives::utils::parse_units;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;

use crate::constants::BPS_DENOMINATOR;
use crate::error::RouteError;
use crate::path::Path;
use crate::{GravityPayment, ERC20};

/// Parse a human amount such as `"10.5"` into base units for a token with
/// `decimals` decimals.
///
/// More fractional digits than the token carries is an error, never a
/// truncation.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, RouteError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RouteError::InvalidAmount("amount is empty".to_string()));
    }
    if trimmed.starts_with('-') {
        return Err(RouteError::InvalidAmount(format!("{trimmed}: negative amount")));
    }
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > usize::from(decimals) {
            return Err(RouteError::InvalidAmount(format!(
                "{trimmed}: more than {decimals} decimal places"
            )));
        }
    }
    parse_units(trimmed, decimals)
        .map(|units| units.get_absolute())
        .map_err(|e| RouteError::InvalidAmount(format!("{trimmed}: {e}")))
}

/// Parse an explicit decimals override. Values outside `u8` are rejected.
pub fn parse_decimals(raw: &str) -> Result<u8, RouteError> {
    raw.trim()
        .parse::<u8>()
        .map_err(|e| RouteError::InvalidAmount(format!("decimals {:?}: {e}", raw.trim())))
}

/// Query the ERC-20 `decimals()` of `token`.
pub async fn token_decimals<P: Provider>(provider: &P, token: Address) -> Result<u8, RouteError> {
    let contract = ERC20::new(token, provider);
    contract
        .decimals()
        .call()
        .await
        .map_err(|e| RouteError::Chain(format!("decimals({token:#x}) failed: {e}")))
}

/// Numeric id for a payment link. Decimal strings are used as-is; anything
/// else goes through a 32-bit `h * 31 + c` rolling hash over UTF-16 code
/// units, made non-negative.
pub fn event_id(raw: &str) -> U256 {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(id) = U256::from_str_radix(raw, 10) {
            return id;
        }
    }

    let mut hash: i32 = 0;
    for unit in raw.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    U256::from(i64::from(hash).unsigned_abs())
}

/// Lowest acceptable output for `quote` given a slippage tolerance in basis
/// points. Tolerances above 100% clamp to 100%.
pub fn min_amount_out(quote: U256, slippage_bps: u16) -> U256 {
    let bps = slippage_bps.min(BPS_DENOMINATOR);
    let keep = U256::from(BPS_DENOMINATOR - bps);
    quote.saturating_mul(keep) / U256::from(BPS_DENOMINATOR)
}

/// Ask the payment contract how much settlement token `amount_in` of
/// `token_in` yields along `path`, and apply slippage.
///
/// A zero quote means the pools along the path cannot fill the amount.
pub async fn quote_min_out<P: Provider>(
    provider: &P,
    payment_contract: Address,
    token_in: Address,
    amount_in: U256,
    path: &Path,
    slippage_bps: u16,
) -> Result<U256, RouteError> {
    let contract = GravityPayment::new(payment_contract, provider);
    let quote = contract
        .getQuote(token_in, amount_in, path.tokens().to_vec())
        .call()
        .await
        .map_err(|e| RouteError::Chain(format!("getQuote failed: {e}")))?;

    if quote.is_zero() {
        return Err(RouteError::InvalidPath(
            "quote is 0: insufficient liquidity or invalid path".to_string(),
        ));
    }

    let min_out = min_amount_out(quote, slippage_bps);
    tracing::debug!(%quote, %min_out, slippage_bps, "quoted payment");
    Ok(min_out)
}

/// Snapshot of the payer form used to gate the pay button.
#[derive(Debug, Clone, Default)]
pub struct PaymentReadiness {
    pub token_in: Option<Address>,
    pub amount_in: U256,
    pub route: Option<Path>,
    pub approving: bool,
    pub paying: bool,
}

impl PaymentReadiness {
    /// A token is picked, the amount is positive, a route was found and no
    /// approval or payment is already in flight.
    pub fn can_pay(&self) -> bool {
        self.token_in.is_some()
            && !self.amount_in.is_zero()
            && self.route.is_some()
            && !self.approving
            && !self.paying
    }
}
