/**
 * Fee Split Specification
 *
 * Weighted claims on a locked position's fee stream. Weights are basis
 * points scoped to one or both pool sides; whatever a side's recipients do
 * not claim flows to the current holder of the ownership token.
 */

use anchor_lang::prelude::*;

use crate::{LaunchpadError, BPS_DENOMINATOR, MAX_FEE_RECIPIENTS};

/// Which side(s) of the pool pair a recipient's weight applies to
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeSide {
    TokenA,
    TokenB,
    Both,
}

impl FeeSide {
    pub fn applies_to_a(&self) -> bool {
        matches!(self, FeeSide::TokenA | FeeSide::Both)
    }

    pub fn applies_to_b(&self) -> bool {
        matches!(self, FeeSide::TokenB | FeeSide::Both)
    }
}

/// One weighted secondary claimant on the fee stream
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdditionalFeeRecipient {
    pub address: Pubkey,
    pub weight_bps: u16,
    pub side: FeeSide,
}

impl AdditionalFeeRecipient {
    pub const LEN: usize = 32 + // address
        2 +  // weight_bps
        1;   // side
}

/// The fee-owner identity plus the ordered secondary recipient list
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct FeeSplitSpec {
    /// One-of-one mint whose current holder is the administrative fee owner
    pub fee_authority_mint: Pubkey,
    pub recipients: Vec<AdditionalFeeRecipient>,
}

impl FeeSplitSpec {
    pub const MAX_LEN: usize = 32 + // fee_authority_mint
        4 + MAX_FEE_RECIPIENTS * AdditionalFeeRecipient::LEN; // recipients

    /// Per-side weight totals
    pub fn side_totals(&self) -> (u64, u64) {
        let mut side_a = 0u64;
        let mut side_b = 0u64;
        for r in &self.recipients {
            if r.side.applies_to_a() {
                side_a += r.weight_bps as u64;
            }
            if r.side.applies_to_b() {
                side_b += r.weight_bps as u64;
            }
        }
        (side_a, side_b)
    }

    /// Registration-time validation: at least one recipient, all addresses
    /// nonzero, count within the configured maximum, and each side's weight
    /// total within 10000 bps.
    pub fn validate(&self, max_recipients: u8) -> Result<()> {
        require!(!self.recipients.is_empty(), LaunchpadError::NoFeeRecipients);
        require!(
            self.recipients.len() <= max_recipients as usize
                && self.recipients.len() <= MAX_FEE_RECIPIENTS,
            LaunchpadError::TooManyFeeRecipients
        );
        for r in &self.recipients {
            require!(r.address != Pubkey::default(), LaunchpadError::NullRecipient);
        }
        let (side_a, side_b) = self.side_totals();
        require!(
            side_a <= BPS_DENOMINATOR && side_b <= BPS_DENOMINATOR,
            LaunchpadError::WeightSumExceeded
        );
        Ok(())
    }

    /// Number of recipient token accounts a collection call must supply,
    /// in declaration order: one per matched side per recipient.
    pub fn expected_recipient_accounts(&self) -> usize {
        self.recipients
            .iter()
            .map(|r| r.side.applies_to_a() as usize + r.side.applies_to_b() as usize)
            .sum()
    }
}

/// A recipient's share of one side's gross fees, floored
pub fn payout(gross: u64, weight_bps: u16) -> u64 {
    ((gross as u128) * (weight_bps as u128) / (BPS_DENOMINATOR as u128)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(recipients: Vec<AdditionalFeeRecipient>) -> FeeSplitSpec {
        FeeSplitSpec {
            fee_authority_mint: Pubkey::new_unique(),
            recipients,
        }
    }

    fn recipient(weight_bps: u16, side: FeeSide) -> AdditionalFeeRecipient {
        AdditionalFeeRecipient {
            address: Pubkey::new_unique(),
            weight_bps,
            side,
        }
    }

    #[test]
    fn weight_sum_at_exactly_10000_succeeds() {
        let s = spec(vec![
            recipient(2_000, FeeSide::TokenA),
            recipient(8_000, FeeSide::TokenA),
        ]);
        assert!(s.validate(8).is_ok());
    }

    #[test]
    fn weight_sum_of_10001_rejected() {
        let s = spec(vec![
            recipient(2_000, FeeSide::TokenA),
            recipient(8_001, FeeSide::TokenA),
        ]);
        assert_eq!(s.validate(8), Err(LaunchpadError::WeightSumExceeded.into()));

        // 9001 total is fine
        let s = spec(vec![
            recipient(2_000, FeeSide::TokenA),
            recipient(7_001, FeeSide::TokenA),
        ]);
        assert!(s.validate(8).is_ok());
    }

    #[test]
    fn sides_are_independent() {
        let s = spec(vec![
            recipient(9_000, FeeSide::TokenA),
            recipient(9_000, FeeSide::TokenB),
        ]);
        assert!(s.validate(8).is_ok());

        // a Both recipient counts against each side
        let s = spec(vec![
            recipient(6_000, FeeSide::Both),
            recipient(5_000, FeeSide::TokenA),
        ]);
        assert_eq!(s.validate(8), Err(LaunchpadError::WeightSumExceeded.into()));
    }

    #[test]
    fn empty_null_and_oversized_lists_rejected() {
        assert_eq!(
            spec(vec![]).validate(8),
            Err(LaunchpadError::NoFeeRecipients.into())
        );

        let mut null = recipient(100, FeeSide::Both);
        null.address = Pubkey::default();
        assert_eq!(
            spec(vec![null]).validate(8),
            Err(LaunchpadError::NullRecipient.into())
        );

        let many = (0..3).map(|_| recipient(100, FeeSide::TokenA)).collect();
        assert_eq!(
            spec(many).validate(2),
            Err(LaunchpadError::TooManyFeeRecipients.into())
        );
    }

    #[test]
    fn payout_floors_and_zero_gross_pays_nothing() {
        assert_eq!(payout(10_000, 2_500), 2_500);
        assert_eq!(payout(3, 2_500), 0);
        assert_eq!(payout(0, 10_000), 0);
        assert_eq!(payout(u64::MAX, 10_000), u64::MAX);
    }

    #[test]
    fn expected_recipient_accounts_counts_matched_sides() {
        let s = spec(vec![
            recipient(100, FeeSide::TokenA),
            recipient(100, FeeSide::Both),
            recipient(100, FeeSide::TokenB),
        ]);
        assert_eq!(s.expected_recipient_accounts(), 4);
    }
}
