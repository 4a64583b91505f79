/**
 * Collect Fees Instruction
 *
 * Permissionless crank over a locked position. Pulls every accrued fee out
 * of the venue into locker-owned treasuries, pays each registered recipient
 * its floored basis-point share of the matched side, and forwards whatever
 * is left to the current holder of the ownership token. Running it with
 * nothing accrued is a harmless no-op.
 *
 * Remaining accounts: first the recipient token accounts in registration
 * order, one per matched side per recipient (the token A account before the
 * token B account for a Both recipient), then the venue's pass-through
 * accounts in the venue's documented order.
 */

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::state::{fee_split, LockRecord, ProtocolConfig};
use crate::{venue, FeesCollected, LaunchpadError, LOCKER_SEED, LOCK_RECORD_SEED,
    PROTOCOL_CONFIG_SEED,
};

#[derive(Accounts)]
pub struct CollectFees<'info> {
    /// Pays for treasury account creation on the first collection
    #[account(mut)]
    pub caller: Signer<'info>,

    #[account(
        seeds = [PROTOCOL_CONFIG_SEED],
        bump = protocol_config.bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        seeds = [LOCK_RECORD_SEED, lock_record.position_mint.as_ref()],
        bump = lock_record.bump,
    )]
    pub lock_record: Box<Account<'info, LockRecord>>,

    /// Owns the locked position and its fee treasuries
    #[account(
        mut,
        seeds = [LOCKER_SEED],
        bump = protocol_config.locker_bump,
    )]
    pub locker: SystemAccount<'info>,

    /// CHECK: must match `protocol_config.pool_venue_program`
    #[account(address = protocol_config.pool_venue_program @ LaunchpadError::UnexpectedVenue)]
    pub pool_venue_program: UncheckedAccount<'info>,

    /// CHECK: must match the registered position mint
    #[account(address = lock_record.position_mint @ LaunchpadError::InvalidLockRecord)]
    pub position_mint: UncheckedAccount<'info>,

    #[account(address = lock_record.token_a_mint @ LaunchpadError::InvalidVault)]
    pub token_a_mint: Box<Account<'info, Mint>>,

    #[account(address = lock_record.token_b_mint @ LaunchpadError::InvalidVault)]
    pub token_b_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = caller,
        associated_token::mint = token_a_mint,
        associated_token::authority = locker,
    )]
    pub treasury_a: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = caller,
        associated_token::mint = token_b_mint,
        associated_token::authority = locker,
    )]
    pub treasury_b: Box<Account<'info, TokenAccount>>,

    #[account(address = lock_record.fee_split.fee_authority_mint @ LaunchpadError::InvalidFeeOwner)]
    pub ownership_mint: Box<Account<'info, Mint>>,

    /// Proves who the current fee owner is; must hold the one-of-one
    #[account(
        token::mint = ownership_mint,
        constraint = fee_owner_account.amount == 1 @ LaunchpadError::InvalidFeeOwner,
    )]
    pub fee_owner_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = token_a_mint,
        constraint = fee_owner_a.owner == fee_owner_account.owner
            @ LaunchpadError::InvalidRecipientAccount,
    )]
    pub fee_owner_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = token_b_mint,
        constraint = fee_owner_b.owner == fee_owner_account.owner
            @ LaunchpadError::InvalidRecipientAccount,
    )]
    pub fee_owner_b: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(mut ctx: Context<'_, '_, 'info, 'info, CollectFees<'info>>) -> Result<()> {
    let split = ctx.accounts.lock_record.fee_split.clone();
    let expected = split.expected_recipient_accounts();
    require!(
        ctx.remaining_accounts.len() >= expected,
        LaunchpadError::InvalidRecipientAccount
    );
    let (recipient_accounts, venue_passthrough) = ctx.remaining_accounts.split_at(expected);

    let locker_bump = ctx.accounts.protocol_config.locker_bump;
    let locker_seeds: &[&[u8]] = &[LOCKER_SEED, &[locker_bump]];

    // drain the position's accrued fees into the treasuries
    venue::collect_position_fees(
        venue::CollectPositionFees {
            venue_program: &ctx.accounts.pool_venue_program.to_account_info(),
            position_mint: &ctx.accounts.position_mint.to_account_info(),
            position_owner: &ctx.accounts.locker.to_account_info(),
            recipient_a: &ctx.accounts.treasury_a.to_account_info(),
            recipient_b: &ctx.accounts.treasury_b.to_account_info(),
            token_program: &ctx.accounts.token_program.to_account_info(),
            passthrough: venue_passthrough,
        },
        u64::MAX,
        u64::MAX,
        &[locker_seeds],
    )?;

    ctx.accounts.treasury_a.reload()?;
    ctx.accounts.treasury_b.reload()?;

    // everything sitting in a treasury is this round's gross, leftovers
    // from any earlier aborted round included
    let gross_a = ctx.accounts.treasury_a.amount;
    let gross_b = ctx.accounts.treasury_b.amount;

    let mut paid_a = 0u64;
    let mut paid_b = 0u64;
    let mut recipients_paid = 0u8;
    let mut next = 0usize;

    for recipient in &split.recipients {
        if recipient.side.applies_to_a() {
            let amount = fee_split::payout(gross_a, recipient.weight_bps);
            pay_recipient(
                &ctx,
                &recipient_accounts[next],
                ctx.accounts.lock_record.token_a_mint,
                recipient.address,
                &ctx.accounts.treasury_a.to_account_info(),
                amount,
                locker_seeds,
            )?;
            paid_a = paid_a
                .checked_add(amount)
                .ok_or(LaunchpadError::MathOverflow)?;
            if amount > 0 {
                recipients_paid = recipients_paid.saturating_add(1);
            }
            next += 1;
        }
        if recipient.side.applies_to_b() {
            let amount = fee_split::payout(gross_b, recipient.weight_bps);
            pay_recipient(
                &ctx,
                &recipient_accounts[next],
                ctx.accounts.lock_record.token_b_mint,
                recipient.address,
                &ctx.accounts.treasury_b.to_account_info(),
                amount,
                locker_seeds,
            )?;
            paid_b = paid_b
                .checked_add(amount)
                .ok_or(LaunchpadError::MathOverflow)?;
            if amount > 0 {
                recipients_paid = recipients_paid.saturating_add(1);
            }
            next += 1;
        }
    }

    // floored shares never exceed the gross, so the fee owner's remainder
    // is always well defined
    let remainder_a = gross_a
        .checked_sub(paid_a)
        .ok_or(LaunchpadError::MathOverflow)?;
    let remainder_b = gross_b
        .checked_sub(paid_b)
        .ok_or(LaunchpadError::MathOverflow)?;

    if remainder_a > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.treasury_a.to_account_info(),
                    to: ctx.accounts.fee_owner_a.to_account_info(),
                    authority: ctx.accounts.locker.to_account_info(),
                },
                &[locker_seeds],
            ),
            remainder_a,
        )?;
    }
    if remainder_b > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.treasury_b.to_account_info(),
                    to: ctx.accounts.fee_owner_b.to_account_info(),
                    authority: ctx.accounts.locker.to_account_info(),
                },
                &[locker_seeds],
            ),
            remainder_b,
        )?;
    }

    msg!(
        "Collected fees for position {}: {} / {}",
        ctx.accounts.lock_record.position_mint,
        gross_a,
        gross_b
    );

    emit!(FeesCollected {
        position_mint: ctx.accounts.lock_record.position_mint,
        gross_a,
        gross_b,
        fee_owner: ctx.accounts.fee_owner_account.owner,
        recipients_paid,
    });

    Ok(())
}

/// Validate one supplied recipient token account against the registration
/// and pay it its share. Zero shares skip the transfer but still consume
/// the account slot.
fn pay_recipient<'info>(
    ctx: &Context<'_, '_, '_, 'info, CollectFees<'info>>,
    account_info: &'info AccountInfo<'info>,
    expected_mint: Pubkey,
    expected_owner: Pubkey,
    treasury: &AccountInfo<'info>,
    amount: u64,
    locker_seeds: &[&[u8]],
) -> Result<()> {
    let token_account = Account::<TokenAccount>::try_from(account_info)?;
    require_keys_eq!(
        token_account.mint,
        expected_mint,
        LaunchpadError::InvalidRecipientAccount
    );
    require_keys_eq!(
        token_account.owner,
        expected_owner,
        LaunchpadError::InvalidRecipientAccount
    );

    if amount == 0 {
        return Ok(());
    }

    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: treasury.clone(),
                to: account_info.clone(),
                authority: ctx.accounts.locker.to_account_info(),
            },
            &[locker_seeds],
        ),
        amount,
    )?;

    Ok(())
}
