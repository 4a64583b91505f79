/**
 * Conversion Utility
 *
 * Bidirectional fixed-ratio conversion between contributed SOL and issued
 * tokens. Both directions floor, so a round trip can only lose dust, never
 * create it. The intermediate product is carried in u128 and the result is
 * narrowed back to u64 with an explicit overflow check.
 */

use anchor_lang::prelude::*;

use crate::LaunchpadError;

/// Tokens owed for a contribution:
/// floor(contributed * distribution_supply / target)
pub fn to_issued(contributed: u64, target: u64, distribution_supply: u64) -> Result<u64> {
    require!(target > 0, LaunchpadError::TargetTooSmall);

    let wide = (contributed as u128)
        .checked_mul(distribution_supply as u128)
        .ok_or(LaunchpadError::MathOverflow)?
        / target as u128;

    u64::try_from(wide).map_err(|_| error!(LaunchpadError::MathOverflow))
}

/// Inverse conversion, used for refunds and cap checks:
/// floor(issued * target / distribution_supply)
pub fn to_contributed(issued: u64, target: u64, distribution_supply: u64) -> Result<u64> {
    require!(distribution_supply > 0, LaunchpadError::InvalidSupplyAllocation);

    let wide = (issued as u128)
        .checked_mul(target as u128)
        .ok_or(LaunchpadError::MathOverflow)?
        / distribution_supply as u128;

    u64::try_from(wide).map_err(|_| error!(LaunchpadError::MathOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_ratio() {
        // 1 SOL toward a 10 SOL target with 5000 tokens to distribute
        assert_eq!(to_issued(1_000_000_000, 10_000_000_000, 5_000).unwrap(), 500);
        assert_eq!(to_contributed(500, 10_000_000_000, 5_000).unwrap(), 1_000_000_000);
    }

    #[test]
    fn truncates_toward_zero() {
        // target 10, distribution 5: one base unit converts to 0.5, floored
        assert_eq!(to_issued(1, 10, 5).unwrap(), 0);
        assert_eq!(to_issued(3, 10, 5).unwrap(), 1);
        assert_eq!(to_contributed(1, 10, 5).unwrap(), 2);
    }

    #[test]
    fn round_trip_never_gains() {
        let cases: &[(u64, u64, u64)] = &[
            (1, 10, 5),
            (7, 10, 5),
            (999, 1_000, 333),
            (123_456_789, 1_000_000_000, 777_777),
            (1_000_000_000, 10_000_000_000, 5_000),
            (u64::MAX / 2, u64::MAX, 1_000_000),
        ];
        for &(contributed, target, supply) in cases {
            let issued = to_issued(contributed, target, supply).unwrap();
            let back = to_contributed(issued, target, supply).unwrap();
            assert!(
                back <= contributed,
                "round trip gained: {} -> {} -> {}",
                contributed,
                issued,
                back
            );
        }
    }

    #[test]
    fn wide_intermediate_no_overflow() {
        // product of two near-2^64 values must not overflow the intermediate
        let issued = to_issued(u64::MAX, u64::MAX, u64::MAX).unwrap();
        assert_eq!(issued, u64::MAX);
    }

    #[test]
    fn narrowing_overflow_rejected() {
        // result larger than u64 must be rejected, not wrapped
        let res = to_issued(u64::MAX, 1, u64::MAX);
        assert_eq!(res, Err(LaunchpadError::MathOverflow.into()));
    }

    #[test]
    fn zero_divisors_rejected() {
        assert!(to_issued(1, 0, 5).is_err());
        assert!(to_contributed(1, 10, 0).is_err());
    }
}
