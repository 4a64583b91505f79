/**
 * Launch State
 *
 * One account per funding campaign. The lifecycle has exactly two phases,
 * both derived from ledger data: Active while the running total is below
 * the target, Finalized once it equals the target. There is no failed or
 * cancelled state and no expiry.
 */

use anchor_lang::prelude::*;

use crate::state::FeeSplitSpec;
use crate::{LaunchpadError, BPS_DENOMINATOR, MAX_FEE_BPS, MIN_TARGET_CONTRIBUTION};

/// Token-issuance arguments, echoed in the creation event for indexers
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct AssetParams {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub decimals: u8,
    pub total_supply: u64,
}

/// Economic parameters fixed at creation
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct LaunchParams {
    /// Funding target in lamports; reaching it exactly finalizes the launch
    pub target_contribution: u64,
    /// Optional per-contributor cap in lamports
    pub max_contribution: Option<u64>,
    /// Supply deposited into the pool at finalization
    pub pool_supply: u64,
    /// Supply distributed to contributors at the fixed ratio
    pub distribution_supply: u64,
    /// Supply transferred to the reserved recipient at finalization
    pub reserved_supply: u64,
    pub reserved_recipient: Option<Pubkey>,
    /// Merkle allowlist commitment; None means open to all
    pub allowlist_root: Option<[u8; 32]>,
    pub finalization_fee_bps: u16,
    pub withdraw_fee_bps: u16,
    pub fee_recipients: Vec<crate::state::AdditionalFeeRecipient>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchPhase {
    Active,
    Finalized,
}

#[account]
pub struct Launch {
    /// Monotonic id, assigned from 1; 0 is invalid and ids are never reused
    pub id: u64,
    pub creator: Pubkey,

    /// Issued asset mint (mint authority revoked at creation, freeze
    /// authority held by this launch PDA)
    pub mint: Pubkey,
    /// One-of-one ownership token; its holder is the administrative fee owner
    pub ownership_mint: Pubkey,

    pub target_contribution: u64,
    pub total_contributions: u64,
    pub max_contribution: Option<u64>,

    pub pool_supply: u64,
    pub distribution_supply: u64,
    pub reserved_supply: u64,
    pub reserved_recipient: Option<Pubkey>,

    pub allowlist_root: Option<[u8; 32]>,

    pub finalization_fee_bps: u16,
    pub withdraw_fee_bps: u16,

    pub fee_split: FeeSplitSpec,

    /// One-way flag set during finalization
    pub succeeded: bool,

    pub created_at: i64,
    pub bump: u8,
    pub sol_vault_bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 64],
}

impl Launch {
    pub const LEN: usize = 8 + // discriminator
        8 +  // id
        32 + // creator
        32 + // mint
        32 + // ownership_mint
        8 +  // target_contribution
        8 +  // total_contributions
        9 +  // max_contribution
        8 +  // pool_supply
        8 +  // distribution_supply
        8 +  // reserved_supply
        33 + // reserved_recipient
        33 + // allowlist_root
        2 +  // finalization_fee_bps
        2 +  // withdraw_fee_bps
        FeeSplitSpec::MAX_LEN + // fee_split
        1 +  // succeeded
        8 +  // created_at
        1 +  // bump
        1 +  // sol_vault_bump
        64;  // reserved

    // =========================================================================
    // PHASE
    // =========================================================================

    /// Phase is derived purely from ledger data
    pub fn phase(&self) -> LaunchPhase {
        if self.total_contributions < self.target_contribution {
            LaunchPhase::Active
        } else {
            LaunchPhase::Finalized
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase() == LaunchPhase::Active
    }

    pub fn is_finalized(&self) -> bool {
        self.phase() == LaunchPhase::Finalized
    }

    // =========================================================================
    // CONTRIBUTION ACCOUNTING
    // =========================================================================

    /// Record an incoming contribution. Returns true when this contribution
    /// completed the target and the caller must finalize in the same
    /// instruction. An amount that would overshoot the target is rejected
    /// outright; the contributor must resubmit with the exact remainder.
    pub fn record_contribution(&mut self, amount: u64) -> Result<bool> {
        require!(self.is_active(), LaunchpadError::LaunchNotActive);
        require!(amount > 0, LaunchpadError::ZeroContribution);

        let new_total = self
            .total_contributions
            .checked_add(amount)
            .ok_or(LaunchpadError::MathOverflow)?;
        require!(
            new_total <= self.target_contribution,
            LaunchpadError::TargetHeadroomExceeded
        );

        self.total_contributions = new_total;
        Ok(new_total == self.target_contribution)
    }

    /// Record a full withdrawal of `gross` lamports (the fee is carved out
    /// of the payout afterwards, never out of the running total)
    pub fn record_withdrawal(&mut self, gross: u64) -> Result<()> {
        require!(self.is_active(), LaunchpadError::LaunchNotActive);
        self.total_contributions = self
            .total_contributions
            .checked_sub(gross)
            .ok_or(LaunchpadError::MathOverflow)?;
        Ok(())
    }

    /// One-way success flag, guarded against double-set
    pub fn mark_succeeded(&mut self) -> Result<()> {
        require!(!self.succeeded, LaunchpadError::AlreadySucceeded);
        self.succeeded = true;
        Ok(())
    }

    // =========================================================================
    // FEE MATH
    // =========================================================================

    /// Finalization fee and pool deposit. The pool deposit must stay
    /// strictly positive after both fees; creation enforces a minimum
    /// target but this is re-verified at finalization time.
    pub fn finalization_amounts(&self, locker_flat_fee: u64) -> Result<(u64, u64)> {
        let fee = ((self.target_contribution as u128)
            * (self.finalization_fee_bps as u128)
            / (BPS_DENOMINATOR as u128)) as u64;

        let pool_amount = self
            .target_contribution
            .checked_sub(fee)
            .and_then(|v| v.checked_sub(locker_flat_fee))
            .ok_or(LaunchpadError::PoolAmountTooSmall)?;
        require!(pool_amount > 0, LaunchpadError::PoolAmountTooSmall);

        Ok((fee, pool_amount))
    }

    /// Withdrawal fee on the gross converted amount
    pub fn withdrawal_fee(&self, gross: u64) -> u64 {
        ((gross as u128) * (self.withdraw_fee_bps as u128) / (BPS_DENOMINATOR as u128)) as u64
    }
}

/// Creation-time validation of the full parameter set
pub fn validate_launch_params(
    asset: &AssetParams,
    params: &LaunchParams,
    max_fee_recipients: u8,
) -> Result<()> {
    require!(
        params.target_contribution >= MIN_TARGET_CONTRIBUTION,
        LaunchpadError::TargetTooSmall
    );
    require!(
        params.finalization_fee_bps <= MAX_FEE_BPS && params.withdraw_fee_bps <= MAX_FEE_BPS,
        LaunchpadError::InvalidFeeRate
    );

    let allocated = params
        .pool_supply
        .checked_add(params.distribution_supply)
        .and_then(|v| v.checked_add(params.reserved_supply))
        .ok_or(LaunchpadError::MathOverflow)?;
    require!(
        allocated == asset.total_supply,
        LaunchpadError::InvalidSupplyAllocation
    );
    require!(
        params.distribution_supply > 0,
        LaunchpadError::InvalidSupplyAllocation
    );

    if params.reserved_supply > 0 {
        let recipient = params
            .reserved_recipient
            .ok_or(LaunchpadError::MissingReservedRecipient)?;
        require!(
            recipient != Pubkey::default(),
            LaunchpadError::MissingReservedRecipient
        );
    }

    let split = FeeSplitSpec {
        fee_authority_mint: Pubkey::default(),
        recipients: params.fee_recipients.clone(),
    };
    split.validate(max_fee_recipients)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AdditionalFeeRecipient, FeeSide};

    fn test_launch(target: u64, distribution_supply: u64) -> Launch {
        Launch {
            id: 1,
            creator: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            ownership_mint: Pubkey::new_unique(),
            target_contribution: target,
            total_contributions: 0,
            max_contribution: None,
            pool_supply: 0,
            distribution_supply,
            reserved_supply: 0,
            reserved_recipient: None,
            allowlist_root: None,
            finalization_fee_bps: 100,
            withdraw_fee_bps: 100,
            fee_split: FeeSplitSpec {
                fee_authority_mint: Pubkey::new_unique(),
                recipients: vec![AdditionalFeeRecipient {
                    address: Pubkey::new_unique(),
                    weight_bps: 1_000,
                    side: FeeSide::Both,
                }],
            },
            succeeded: false,
            created_at: 0,
            bump: 255,
            sol_vault_bump: 255,
            reserved: [0u8; 64],
        }
    }

    fn test_params(target: u64, total_supply: u64) -> (AssetParams, LaunchParams) {
        let asset = AssetParams {
            name: "Test".into(),
            symbol: "TST".into(),
            uri: "https://example.com/t.json".into(),
            decimals: 6,
            total_supply,
        };
        let params = LaunchParams {
            target_contribution: target,
            max_contribution: None,
            pool_supply: total_supply / 2,
            distribution_supply: total_supply - total_supply / 2,
            reserved_supply: 0,
            reserved_recipient: None,
            allowlist_root: None,
            finalization_fee_bps: 100,
            withdraw_fee_bps: 100,
            fee_recipients: vec![AdditionalFeeRecipient {
                address: Pubkey::new_unique(),
                weight_bps: 1_000,
                side: FeeSide::Both,
            }],
        };
        (asset, params)
    }

    #[test]
    fn phase_follows_total() {
        let mut launch = test_launch(10, 5);
        assert_eq!(launch.phase(), LaunchPhase::Active);

        assert!(!launch.record_contribution(4).unwrap());
        assert_eq!(launch.phase(), LaunchPhase::Active);

        // exact completion flips the phase and reports finalization
        assert!(launch.record_contribution(6).unwrap());
        assert_eq!(launch.phase(), LaunchPhase::Finalized);

        // no operation may touch a finalized ledger
        assert_eq!(
            launch.record_contribution(1),
            Err(LaunchpadError::LaunchNotActive.into())
        );
        assert_eq!(
            launch.record_withdrawal(1),
            Err(LaunchpadError::LaunchNotActive.into())
        );
    }

    #[test]
    fn overshoot_rejected_without_state_change() {
        let mut launch = test_launch(10, 5);
        launch.record_contribution(9).unwrap();

        // exceeding the target by even one unit reverts, never clamps
        assert_eq!(
            launch.record_contribution(2),
            Err(LaunchpadError::TargetHeadroomExceeded.into())
        );
        assert_eq!(launch.total_contributions, 9);

        assert!(launch.record_contribution(1).unwrap());
        assert_eq!(launch.total_contributions, 10);
    }

    #[test]
    fn zero_contribution_rejected() {
        let mut launch = test_launch(10, 5);
        assert_eq!(
            launch.record_contribution(0),
            Err(LaunchpadError::ZeroContribution.into())
        );
    }

    #[test]
    fn withdrawal_decreases_total_by_gross() {
        // Scenario: contribute, then ragequit before finalization. The
        // running total drops by the gross converted amount; the fee only
        // reduces the payout.
        let mut launch = test_launch(10_000_000_000, 5_000);
        launch.record_contribution(1_000_000_000).unwrap();

        let issued = crate::conversion::to_issued(1_000_000_000, 10_000_000_000, 5_000).unwrap();
        assert_eq!(issued, 500);

        let gross = crate::conversion::to_contributed(issued, 10_000_000_000, 5_000).unwrap();
        assert_eq!(gross, 1_000_000_000);

        let fee = launch.withdrawal_fee(gross);
        assert_eq!(fee, 10_000_000); // 100 bps

        launch.record_withdrawal(gross).unwrap();
        assert_eq!(launch.total_contributions, 0);
    }

    #[test]
    fn succeeded_flag_is_one_way() {
        let mut launch = test_launch(10, 5);
        launch.mark_succeeded().unwrap();
        assert_eq!(
            launch.mark_succeeded(),
            Err(LaunchpadError::AlreadySucceeded.into())
        );
    }

    #[test]
    fn finalization_amounts_carve_both_fees() {
        let mut launch = test_launch(10_000_000_000, 5_000);
        launch.finalization_fee_bps = 250;

        let (fee, pool_amount) = launch.finalization_amounts(50_000_000).unwrap();
        assert_eq!(fee, 250_000_000);
        assert_eq!(pool_amount, 10_000_000_000 - 250_000_000 - 50_000_000);
    }

    #[test]
    fn finalization_rejects_non_positive_pool_amount() {
        let mut launch = test_launch(100, 5);
        launch.finalization_fee_bps = 0;

        assert_eq!(
            launch.finalization_amounts(100),
            Err(LaunchpadError::PoolAmountTooSmall.into())
        );
        assert_eq!(
            launch.finalization_amounts(101),
            Err(LaunchpadError::PoolAmountTooSmall.into())
        );
        assert!(launch.finalization_amounts(99).is_ok());
    }

    #[test]
    fn params_validation() {
        let (asset, params) = test_params(MIN_TARGET_CONTRIBUTION, 1_000_000);
        assert!(validate_launch_params(&asset, &params, 8).is_ok());

        // fee bounds
        let (asset, mut params) = test_params(MIN_TARGET_CONTRIBUTION, 1_000_000);
        params.finalization_fee_bps = MAX_FEE_BPS + 1;
        assert_eq!(
            validate_launch_params(&asset, &params, 8),
            Err(LaunchpadError::InvalidFeeRate.into())
        );

        // allocations must sum to total supply
        let (asset, mut params) = test_params(MIN_TARGET_CONTRIBUTION, 1_000_000);
        params.pool_supply += 1;
        assert_eq!(
            validate_launch_params(&asset, &params, 8),
            Err(LaunchpadError::InvalidSupplyAllocation.into())
        );

        // a reserved allocation requires a recipient
        let (asset, mut params) = test_params(MIN_TARGET_CONTRIBUTION, 1_000_000);
        params.reserved_supply = 100;
        params.distribution_supply -= 100;
        assert_eq!(
            validate_launch_params(&asset, &params, 8),
            Err(LaunchpadError::MissingReservedRecipient.into())
        );
        params.reserved_recipient = Some(Pubkey::new_unique());
        assert!(validate_launch_params(&asset, &params, 8).is_ok());

        // target minimum
        let (asset, mut params) = test_params(MIN_TARGET_CONTRIBUTION, 1_000_000);
        params.target_contribution = MIN_TARGET_CONTRIBUTION - 1;
        assert_eq!(
            validate_launch_params(&asset, &params, 8),
            Err(LaunchpadError::TargetTooSmall.into())
        );
    }
}
