//! Token addresses and conversion paths.
//!
//! Addresses compare by their 20 bytes, so `0xABC…` and `0xabc…` name the
//! same token once parsed. [`canonical`] gives the lowercase text form used in
//! logs and reports.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RouteError;

/// Parse a token address in any hex case. Checksums are not enforced.
pub fn parse_token(raw: &str) -> Result<Address, RouteError> {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex.len() != 40 {
        return Err(RouteError::InvalidAddress(format!(
            "{trimmed}: expected 40 hex digits, got {}",
            hex.len()
        )));
    }
    hex.to_ascii_lowercase()
        .parse::<Address>()
        .map_err(|e| RouteError::InvalidAddress(format!("{trimmed}: {e}")))
}

/// Lowercase `0x`-prefixed form of an address.
pub fn canonical(token: &Address) -> String {
    format!("{token:#x}")
}

/// Ordered, non-empty sequence of tokens. The first is the token the payer
/// holds, the last is the token the route settles in, and each adjacent pair
/// is a direct conversion registered with the router.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Address>", into = "Vec<Address>")]
pub struct Path(Vec<Address>);

impl Path {
    pub fn new(tokens: Vec<Address>) -> Result<Self, RouteError> {
        if tokens.is_empty() {
            return Err(RouteError::InvalidPath("path must contain at least one token".to_string()));
        }
        Ok(Self(tokens))
    }

    /// Zero-hop route for a token that already is the destination.
    pub fn identity(token: Address) -> Self {
        Self(vec![token])
    }

    /// This path with one more conversion into `token`.
    pub fn extended(&self, token: Address) -> Self {
        let mut tokens = Vec::with_capacity(self.0.len() + 1);
        tokens.extend_from_slice(&self.0);
        tokens.push(token);
        Self(tokens)
    }

    /// Number of conversions.
    pub fn hops(&self) -> usize {
        self.0.len() - 1
    }

    pub fn source(&self) -> Address {
        self.0[0]
    }

    pub fn destination(&self) -> Address {
        self.0[self.0.len() - 1]
    }

    /// Tokens strictly between source and destination.
    pub fn intermediates(&self) -> &[Address] {
        if self.0.len() < 2 {
            &[]
        } else {
            &self.0[1..self.0.len() - 1]
        }
    }

    pub fn tokens(&self) -> &[Address] {
        &self.0
    }

    pub fn contains(&self, token: &Address) -> bool {
        self.0.contains(token)
    }

    pub fn into_tokens(self) -> Vec<Address> {
        self.0
    }
}

impl TryFrom<Vec<Address>> for Path {
    type Error = RouteError;

    fn try_from(tokens: Vec<Address>) -> Result<Self, Self::Error> {
        Self::new(tokens)
    }
}

impl From<Path> for Vec<Address> {
    fn from(path: Path) -> Self {
        path.0
    }
}

impl AsRef<[Address]> for Path {
    fn as_ref(&self) -> &[Address] {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{token:#x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDC_MIXED: &str = "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238";

    #[test]
    fn test_parse_token_is_case_insensitive() {
        let mixed = parse_token(USDC_MIXED).unwrap();
        let lower = parse_token(&USDC_MIXED.to_lowercase()).unwrap();
        let upper = parse_token(&format!("0x{}", USDC_MIXED[2..].to_uppercase())).unwrap();
        assert_eq!(mixed, lower);
        assert_eq!(mixed, upper);
        assert_eq!(canonical(&upper), USDC_MIXED.to_lowercase());
    }

    #[test]
    fn test_parse_token_rejects_bad_input() {
        assert!(parse_token("0x1234").is_err());
        assert!(parse_token("").is_err());
        assert!(parse_token("0xzz7D4B196Cb0C7B01d743Fbc6116a902379C7238").is_err());
    }

    #[test]
    fn test_parse_token_accepts_missing_prefix_and_whitespace() {
        let bare = parse_token(&format!("  {}  ", &USDC_MIXED[2..])).unwrap();
        assert_eq!(bare, parse_token(USDC_MIXED).unwrap());
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(Path::new(vec![]), Err(RouteError::InvalidPath(_))));
    }

    #[test]
    fn test_path_accessors() {
        let a = Address::with_last_byte(1);
        let b = Address::with_last_byte(2);
        let c = Address::with_last_byte(3);
        let path = Path::new(vec![a, b, c]).unwrap();
        assert_eq!(path.hops(), 2);
        assert_eq!(path.source(), a);
        assert_eq!(path.destination(), c);
        assert_eq!(path.intermediates(), &[b]);
        assert!(path.contains(&b));

        let identity = Path::identity(a);
        assert_eq!(identity.hops(), 0);
        assert_eq!(identity.source(), identity.destination());
        assert!(identity.intermediates().is_empty());
    }

    #[test]
    fn test_path_serializes_as_address_list() {
        let path = Path::new(vec![Address::with_last_byte(1), Address::with_last_byte(2)]).unwrap();
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);

        let back: Path = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);

        let empty: Result<Path, _> = serde_json::from_str("[]");
        assert!(empty.is_err());
    }

    #[test]
    fn test_display_uses_lowercase() {
        let path = Path::new(vec![
            parse_token(USDC_MIXED).unwrap(),
            Address::with_last_byte(0xab),
        ])
        .unwrap();
        assert_eq!(
            path.to_string(),
            "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238 -> 0x00000000000000000000000000000000000000ab"
        );
    }
}
