/**
 * Lock Record State
 *
 * One record per permanently locked liquidity position, keyed by the
 * position mint and owned by the locker authority PDA. Created exactly once
 * during finalization; afterwards only read by fee collection. Collection
 * keeps no running totals of its own: every call reads the venue's ground
 * truth fresh, so the record cannot drift out of sync.
 */

use anchor_lang::prelude::*;

use crate::state::FeeSplitSpec;

#[account]
pub struct LockRecord {
    /// Launch this position was seeded from
    pub launch_id: u64,

    /// Position NFT mint; also this record's PDA key
    pub position_mint: Pubkey,

    /// Side A of the pool pair (wrapped SOL)
    pub token_a_mint: Pubkey,
    /// Side B of the pool pair (the issued asset)
    pub token_b_mint: Pubkey,

    pub fee_split: FeeSplitSpec,

    pub bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 32],
}

impl LockRecord {
    pub const LEN: usize = 8 + // discriminator
        8 +  // launch_id
        32 + // position_mint
        32 + // token_a_mint
        32 + // token_b_mint
        FeeSplitSpec::MAX_LEN + // fee_split
        1 +  // bump
        32;  // reserved

    /// Lamports still owed to make the record rent exempt, tolerating any
    /// balance already parked at the address
    pub fn rent_shortfall(required: u64, current: u64) -> u64 {
        required.saturating_sub(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rent_shortfall_tolerates_prefunded_balance() {
        // lamports sent to the record address by a third party before
        // finalization reduce the top-up; they must never abort it
        assert_eq!(LockRecord::rent_shortfall(1_000, 0), 1_000);
        assert_eq!(LockRecord::rent_shortfall(1_000, 1), 999);
        assert_eq!(LockRecord::rent_shortfall(1_000, 1_000), 0);
        assert_eq!(LockRecord::rent_shortfall(1_000, 5_000), 0);
    }
}
