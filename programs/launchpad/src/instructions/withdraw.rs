/**
 * Withdraw Instruction
 *
 * All-or-nothing ragequit while the launch is Active: the contributor's
 * entire issued balance converts back to lamports at the fixed ratio, the
 * running total drops by the gross amount, the withdrawal fee goes to the
 * protocol fee recipient and the remainder goes to a receiver of the
 * contributor's choosing.
 * Issued tokens flow back into the launch vault so the fixed ratio holds
 * for later contributors.
 */

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token::{self, Mint, ThawAccount, Token, TokenAccount, Transfer};

use crate::state::{Launch, ProtocolConfig};
use crate::{
    conversion, ContributionWithdrawn, LaunchpadError, LAUNCH_SEED, PROTOCOL_CONFIG_SEED,
    SOL_VAULT_SEED,
};

#[derive(Accounts)]
#[instruction(launch_id: u64)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub contributor: Signer<'info>,

    #[account(
        seeds = [PROTOCOL_CONFIG_SEED],
        bump = protocol_config.bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [LAUNCH_SEED, &launch_id.to_le_bytes()],
        bump = launch.bump,
    )]
    pub launch: Account<'info, Launch>,

    #[account(
        mut,
        seeds = [SOL_VAULT_SEED, &launch_id.to_le_bytes()],
        bump = launch.sol_vault_bump,
    )]
    pub sol_vault: SystemAccount<'info>,

    #[account(address = launch.mint @ LaunchpadError::InvalidVault)]
    pub mint: Account<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = mint,
        associated_token::authority = launch,
    )]
    pub launch_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = mint,
        associated_token::authority = contributor,
    )]
    pub contributor_token_account: Account<'info, TokenAccount>,

    /// CHECK: must match `protocol_config.fee_recipient`
    #[account(
        mut,
        address = protocol_config.fee_recipient @ LaunchpadError::InvalidVault,
    )]
    pub fee_recipient: UncheckedAccount<'info>,

    /// CHECK: payout destination chosen by the contributor
    #[account(mut)]
    pub receiver: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Withdraw>, launch_id: u64) -> Result<()> {
    let launch = &ctx.accounts.launch;
    require!(launch.is_active(), LaunchpadError::LaunchNotActive);

    let issued = ctx.accounts.contributor_token_account.amount;
    require!(issued > 0, LaunchpadError::NothingToWithdraw);

    let gross = conversion::to_contributed(
        issued,
        launch.target_contribution,
        launch.distribution_supply,
    )?;
    require!(gross > 0, LaunchpadError::NothingToWithdraw);

    let fee = launch.withdrawal_fee(gross);
    let payout = gross.checked_sub(fee).ok_or(LaunchpadError::MathOverflow)?;

    // ledger first, transfers after
    let launch = &mut ctx.accounts.launch;
    launch.record_withdrawal(gross)?;

    let launch_id_bytes = launch_id.to_le_bytes();
    let launch_bump = ctx.accounts.launch.bump;
    let sol_vault_bump = ctx.accounts.launch.sol_vault_bump;
    let launch_seeds: &[&[u8]] = &[LAUNCH_SEED, &launch_id_bytes, &[launch_bump]];
    let sol_vault_seeds: &[&[u8]] = &[SOL_VAULT_SEED, &launch_id_bytes, &[sol_vault_bump]];

    // the full issued balance returns to the vault; the account is thawed
    // for the transfer and left empty
    token::thaw_account(CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        ThawAccount {
            account: ctx.accounts.contributor_token_account.to_account_info(),
            mint: ctx.accounts.mint.to_account_info(),
            authority: ctx.accounts.launch.to_account_info(),
        },
        &[launch_seeds],
    ))?;
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.contributor_token_account.to_account_info(),
                to: ctx.accounts.launch_vault.to_account_info(),
                authority: ctx.accounts.contributor.to_account_info(),
            },
        ),
        issued,
    )?;

    if fee > 0 {
        system_program::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: ctx.accounts.sol_vault.to_account_info(),
                    to: ctx.accounts.fee_recipient.to_account_info(),
                },
                &[sol_vault_seeds],
            ),
            fee,
        )?;
    }
    system_program::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.sol_vault.to_account_info(),
                to: ctx.accounts.receiver.to_account_info(),
            },
            &[sol_vault_seeds],
        ),
        payout,
    )?;

    emit!(ContributionWithdrawn {
        launch_id,
        contributor: ctx.accounts.contributor.key(),
        receiver: ctx.accounts.receiver.key(),
        issued_returned: issued,
        gross_amount: gross,
        fee,
    });

    Ok(())
}
