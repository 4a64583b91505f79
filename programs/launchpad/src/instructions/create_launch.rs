/**
 * Create Launch Instruction
 *
 * Issues the token (full supply to the launch vault, mint authority
 * revoked, freeze authority retained by the launch PDA), mints the
 * one-of-one ownership token to the creator, assigns the next launch id
 * and persists the economic parameters. Optionally performs an immediate
 * creator contribution, which must stay strictly below the target: the
 * completing contribution has to go through `contribute`, which carries
 * the finalization account set.
 */

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{
    self, spl_token::instruction::AuthorityType, FreezeAccount, Mint, MintTo, SetAuthority, Token,
    TokenAccount, Transfer,
};

use crate::state::{
    validate_launch_params, AssetParams, FeeSplitSpec, Launch, LaunchParams, ProtocolConfig,
};
use crate::{
    conversion, ContributionReceived, LaunchCreated, LaunchpadError, LAUNCH_SEED,
    MAX_COMMENT_LEN, PROTOCOL_CONFIG_SEED, SOL_VAULT_SEED,
};

#[derive(Accounts)]
#[instruction(asset_params: AssetParams)]
pub struct CreateLaunch<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [PROTOCOL_CONFIG_SEED],
        bump = protocol_config.bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        init,
        payer = creator,
        space = Launch::LEN,
        seeds = [LAUNCH_SEED, &protocol_config.next_launch_id().to_le_bytes()],
        bump,
    )]
    pub launch: Account<'info, Launch>,

    /// Lamport vault for this launch's contributions
    #[account(
        mut,
        seeds = [SOL_VAULT_SEED, &protocol_config.next_launch_id().to_le_bytes()],
        bump,
    )]
    pub sol_vault: SystemAccount<'info>,

    /// The issued asset
    #[account(
        init,
        payer = creator,
        mint::decimals = asset_params.decimals,
        mint::authority = launch,
        mint::freeze_authority = launch,
    )]
    pub mint: Account<'info, Mint>,

    /// One-of-one administrative-fee-ownership token
    #[account(
        init,
        payer = creator,
        mint::decimals = 0,
        mint::authority = launch,
    )]
    pub ownership_mint: Account<'info, Mint>,

    /// Holds the entire issued supply until it is distributed
    #[account(
        init,
        payer = creator,
        associated_token::mint = mint,
        associated_token::authority = launch,
    )]
    pub launch_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = creator,
        associated_token::mint = mint,
        associated_token::authority = creator,
    )]
    pub creator_token_account: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = creator,
        associated_token::mint = ownership_mint,
        associated_token::authority = creator,
    )]
    pub creator_ownership_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<CreateLaunch>,
    asset_params: AssetParams,
    launch_params: LaunchParams,
    opening_comment: Option<String>,
    initial_contribution: u64,
) -> Result<()> {
    if let Some(comment) = &opening_comment {
        require!(comment.len() <= MAX_COMMENT_LEN, LaunchpadError::CommentTooLong);
    }

    let config = &mut ctx.accounts.protocol_config;
    validate_launch_params(&asset_params, &launch_params, config.max_fee_recipients)?;

    let launch_id = config.next_launch_id();
    config.launch_count = launch_id;

    let launch = &mut ctx.accounts.launch;
    launch.id = launch_id;
    launch.creator = ctx.accounts.creator.key();
    launch.mint = ctx.accounts.mint.key();
    launch.ownership_mint = ctx.accounts.ownership_mint.key();
    launch.target_contribution = launch_params.target_contribution;
    launch.total_contributions = 0;
    launch.max_contribution = launch_params.max_contribution;
    launch.pool_supply = launch_params.pool_supply;
    launch.distribution_supply = launch_params.distribution_supply;
    launch.reserved_supply = launch_params.reserved_supply;
    launch.reserved_recipient = launch_params.reserved_recipient;
    launch.allowlist_root = launch_params.allowlist_root;
    launch.finalization_fee_bps = launch_params.finalization_fee_bps;
    launch.withdraw_fee_bps = launch_params.withdraw_fee_bps;
    launch.fee_split = FeeSplitSpec {
        fee_authority_mint: ctx.accounts.ownership_mint.key(),
        recipients: launch_params.fee_recipients.clone(),
    };
    launch.succeeded = false;
    launch.created_at = Clock::get()?.unix_timestamp;
    launch.bump = ctx.bumps.launch;
    launch.sol_vault_bump = ctx.bumps.sol_vault;

    let launch_id_bytes = launch_id.to_le_bytes();
    let launch_bump = ctx.bumps.launch;
    let launch_seeds: &[&[u8]] = &[LAUNCH_SEED, &launch_id_bytes, &[launch_bump]];

    // full supply to the launch vault, then no further minting is possible
    token::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.mint.to_account_info(),
                to: ctx.accounts.launch_vault.to_account_info(),
                authority: ctx.accounts.launch.to_account_info(),
            },
            &[launch_seeds],
        ),
        asset_params.total_supply,
    )?;
    token::set_authority(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            SetAuthority {
                account_or_mint: ctx.accounts.mint.to_account_info(),
                current_authority: ctx.accounts.launch.to_account_info(),
            },
            &[launch_seeds],
        ),
        AuthorityType::MintTokens,
        None,
    )?;

    // one-of-one ownership token to the creator; the holder of this token
    // is the administrative fee owner, resolved freshly at collection time
    token::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.ownership_mint.to_account_info(),
                to: ctx.accounts.creator_ownership_account.to_account_info(),
                authority: ctx.accounts.launch.to_account_info(),
            },
            &[launch_seeds],
        ),
        1,
    )?;
    token::set_authority(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            SetAuthority {
                account_or_mint: ctx.accounts.ownership_mint.to_account_info(),
                current_authority: ctx.accounts.launch.to_account_info(),
            },
            &[launch_seeds],
        ),
        AuthorityType::MintTokens,
        None,
    )?;

    msg!("Launch #{} created, target {} lamports", launch_id, launch_params.target_contribution);

    emit!(LaunchCreated {
        launch_id,
        creator: ctx.accounts.creator.key(),
        mint: ctx.accounts.mint.key(),
        ownership_mint: ctx.accounts.ownership_mint.key(),
        asset_params: asset_params.clone(),
        launch_params: launch_params.clone(),
        opening_comment: opening_comment.clone(),
    });

    if initial_contribution > 0 {
        // the creation-time contribution may not complete the target; the
        // creator is exempt from their own allowlist
        require!(
            initial_contribution < launch_params.target_contribution,
            LaunchpadError::InitialContributionTooLarge
        );
        if let Some(cap) = launch_params.max_contribution {
            require!(
                initial_contribution <= cap,
                LaunchpadError::ContributionCapExceeded
            );
        }

        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: ctx.accounts.creator.to_account_info(),
                    to: ctx.accounts.sol_vault.to_account_info(),
                },
            ),
            initial_contribution,
        )?;

        let launch = &mut ctx.accounts.launch;
        launch.record_contribution(initial_contribution)?;

        let issued = conversion::to_issued(
            initial_contribution,
            launch.target_contribution,
            launch.distribution_supply,
        )?;
        let total_contributions = launch.total_contributions;

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.launch_vault.to_account_info(),
                    to: ctx.accounts.creator_token_account.to_account_info(),
                    authority: ctx.accounts.launch.to_account_info(),
                },
                &[launch_seeds],
            ),
            issued,
        )?;
        // the creator's balance is their contribution record; sealed while
        // the launch is Active
        token::freeze_account(CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            FreezeAccount {
                account: ctx.accounts.creator_token_account.to_account_info(),
                mint: ctx.accounts.mint.to_account_info(),
                authority: ctx.accounts.launch.to_account_info(),
            },
            &[launch_seeds],
        ))?;

        emit!(ContributionReceived {
            launch_id,
            contributor: ctx.accounts.creator.key(),
            amount: initial_contribution,
            issued,
            total_contributions,
            comment: opening_comment,
        });
    }

    Ok(())
}
