//! Advisory route-quality score shown next to a discovered route.
//!
//! The score never influences which path the finder picks.

use alloy::primitives::Address;

use crate::constants::DEFAULT_HIGH_QUALITY_TOKENS;

const BASE_SCORE: i64 = 100;
const HOP_PENALTY: i64 = 15;
const HIGH_QUALITY_BONUS: i64 = 10;

/// Score a route in `[0, 100]` using the default high-quality token list.
pub fn calculate_route_confidence(path: &[Address], hop_count: usize) -> u8 {
    calculate_route_confidence_with(path, hop_count, DEFAULT_HIGH_QUALITY_TOKENS)
}

/// Score a route in `[0, 100]`: start at 100, lose 15 per hop, gain 10 for
/// every intermediate token (source and destination excluded) found in
/// `high_quality`.
pub fn calculate_route_confidence_with(
    path: &[Address],
    hop_count: usize,
    high_quality: &[Address],
) -> u8 {
    let hops = i64::try_from(hop_count).unwrap_or(i64::MAX / HOP_PENALTY);
    let mut score = BASE_SCORE.saturating_sub(hops.saturating_mul(HOP_PENALTY));

    if path.len() > 2 {
        for token in &path[1..path.len() - 1] {
            if high_quality.contains(token) {
                score = score.saturating_add(HIGH_QUALITY_BONUS);
            }
        }
    }

    score.clamp(0, BASE_SCORE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::USDC_SEPOLIA;

    fn token(b: u8) -> Address {
        Address::with_last_byte(b)
    }

    #[test]
    fn test_two_hops_through_allow_listed_token() {
        let path = [token(0xa), USDC_SEPOLIA, token(0xd)];
        assert_eq!(calculate_route_confidence(&path, 2), 80);
    }

    #[test]
    fn test_plain_hops() {
        let path = [token(1), token(2), token(3), token(4)];
        assert_eq!(calculate_route_confidence(&path, 3), 55);
        assert_eq!(calculate_route_confidence(&[token(1)], 0), 100);
        assert_eq!(calculate_route_confidence(&[token(1), token(2)], 1), 85);
    }

    #[test]
    fn test_endpoints_do_not_earn_bonus() {
        let path = [USDC_SEPOLIA, token(2), USDC_SEPOLIA];
        assert_eq!(calculate_route_confidence(&path, 2), 70);
    }

    #[test]
    fn test_clamped_to_range() {
        let path = [token(1), token(2)];
        assert_eq!(calculate_route_confidence(&path, 10), 0);
        assert_eq!(calculate_route_confidence(&path, usize::MAX), 0);

        // Bonus can't push above 100.
        let allow = [token(2), token(3), token(4)];
        let path = [token(1), token(2), token(3), token(4), token(5)];
        assert_eq!(calculate_route_confidence_with(&path, 1, &allow), 100);
    }

    #[test]
    fn test_custom_allow_list() {
        let allow = [token(0xc)];
        let path = [token(0xa), token(0xc), token(0xd)];
        assert_eq!(calculate_route_confidence_with(&path, 2, &allow), 80);
        assert_eq!(calculate_route_confidence_with(&path, 2, &[]), 70);
    }
}
