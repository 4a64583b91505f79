/**
 * Unlock Tokens Instruction
 *
 * Contributor token accounts are frozen while the launch is Active so that
 * balances double as the contribution ledger. Once the launch finalizes the
 * ledger is no longer needed and anyone may thaw any holder's account.
 * Thawing an already-thawed account is a no-op.
 */

use anchor_lang::prelude::*;
use anchor_spl::token::{
    self, spl_token::state::AccountState, Mint, ThawAccount, Token, TokenAccount,
};

use crate::state::Launch;
use crate::{LaunchpadError, TokensUnlocked, LAUNCH_SEED};

#[derive(Accounts)]
#[instruction(launch_id: u64)]
pub struct UnlockTokens<'info> {
    #[account(
        seeds = [LAUNCH_SEED, &launch_id.to_le_bytes()],
        bump = launch.bump,
    )]
    pub launch: Account<'info, Launch>,

    #[account(address = launch.mint @ LaunchpadError::InvalidVault)]
    pub mint: Account<'info, Mint>,

    #[account(
        mut,
        token::mint = mint,
    )]
    pub token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<UnlockTokens>, launch_id: u64) -> Result<()> {
    require!(
        ctx.accounts.launch.is_finalized(),
        LaunchpadError::LaunchNotFinalized
    );

    if ctx.accounts.token_account.state != AccountState::Frozen {
        return Ok(());
    }

    let launch_id_bytes = launch_id.to_le_bytes();
    let launch_bump = ctx.accounts.launch.bump;
    let launch_seeds: &[&[u8]] = &[LAUNCH_SEED, &launch_id_bytes, &[launch_bump]];

    token::thaw_account(CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        ThawAccount {
            account: ctx.accounts.token_account.to_account_info(),
            mint: ctx.accounts.mint.to_account_info(),
            authority: ctx.accounts.launch.to_account_info(),
        },
        &[launch_seeds],
    ))?;

    emit!(TokensUnlocked {
        launch_id,
        token_account: ctx.accounts.token_account.key(),
    });

    Ok(())
}
