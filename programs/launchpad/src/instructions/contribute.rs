/**
 * Contribute Instruction & Finalization Orchestrator
 *
 * Contributions pull lamports into the launch vault, credit the running
 * total, and pay the contributor issued tokens at the fixed ratio. The
 * contributor's token account is frozen while the launch is Active: the
 * balance is the contribution ledger and nothing else may move it.
 *
 * The contribution that makes the total exactly equal to the target
 * finalizes the launch in the same instruction and must supply the
 * optional finalization accounts plus the venue's pass-through accounts
 * as remaining accounts. An amount that would overshoot the target is
 * rejected outright.
 *
 * Ordering discipline: the running total is updated before any external
 * call, and the contributor's token payout happens last. A venue that
 * reenters sees the launch already Finalized, so `contribute` and
 * `withdraw` both refuse it.
 */

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{
    self,
    spl_token::{native_mint, state::AccountState},
    FreezeAccount, Mint, ThawAccount, Token, TokenAccount, Transfer,
};

use crate::state::{Launch, LockRecord, ProtocolConfig};
use crate::{
    conversion, merkle, venue, ContributionReceived, FeeSplitRegistered, LaunchFinalized,
    LaunchpadError, ReservedSupplyTransferred, LAUNCH_SEED, LOCKER_SEED, LOCK_RECORD_SEED,
    MAX_COMMENT_LEN, PROTOCOL_CONFIG_SEED, SOL_VAULT_SEED,
};

#[derive(Accounts)]
#[instruction(launch_id: u64)]
pub struct Contribute<'info> {
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
        init_if_needed,
        payer = contributor,
        associated_token::mint = mint,
        associated_token::authority = contributor,
    )]
    pub contributor_token_account: Account<'info, TokenAccount>,

    // -------------------------------------------------------------------------
    // Finalization set, required only on the completing contribution.
    // Venue-internal accounts follow as remaining accounts.
    // -------------------------------------------------------------------------

    /// CHECK: must match `protocol_config.fee_recipient`
    #[account(mut)]
    pub fee_recipient: Option<UncheckedAccount<'info>>,

    /// CHECK: must match `protocol_config.pool_venue_program`
    pub pool_venue_program: Option<UncheckedAccount<'info>>,

    /// Fresh keypair; becomes the locked position's NFT mint
    #[account(mut)]
    pub position_mint: Option<Signer<'info>>,

    /// CHECK: locker authority PDA, verified against the stored bump
    #[account(mut)]
    pub locker: Option<UncheckedAccount<'info>>,

    /// CHECK: created and initialized by the finalization path
    #[account(mut)]
    pub lock_record: Option<UncheckedAccount<'info>>,

    /// Required when the launch carries a reserved allocation
    #[account(mut)]
    pub reserved_recipient_token_account: Option<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, Contribute<'info>>,
    launch_id: u64,
    amount: u64,
    comment: Option<String>,
    allowlist_proof: Option<Vec<[u8; 32]>>,
) -> Result<()> {
    if let Some(c) = &comment {
        require!(c.len() <= MAX_COMMENT_LEN, LaunchpadError::CommentTooLong);
    }

    let launch = &ctx.accounts.launch;
    require!(launch.is_active(), LaunchpadError::LaunchNotActive);

    if let Some(root) = launch.allowlist_root {
        let proof = allowlist_proof.ok_or(LaunchpadError::InvalidAllowlistProof)?;
        let leaf = merkle::leaf_hash(launch_id, &ctx.accounts.contributor.key());
        require!(
            merkle::verify(&proof, &root, leaf),
            LaunchpadError::InvalidAllowlistProof
        );
    }

    // the contributor's frozen balance is their prior contribution record
    if let Some(cap) = launch.max_contribution {
        let prior = conversion::to_contributed(
            ctx.accounts.contributor_token_account.amount,
            launch.target_contribution,
            launch.distribution_supply,
        )?;
        let attempted = prior
            .checked_add(amount)
            .ok_or(LaunchpadError::MathOverflow)?;
        require!(attempted <= cap, LaunchpadError::ContributionCapExceeded);
    }

    // pull funds, then update the ledger before any external interaction
    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.contributor.to_account_info(),
                to: ctx.accounts.sol_vault.to_account_info(),
            },
        ),
        amount,
    )?;

    let launch = &mut ctx.accounts.launch;
    let finalizes = launch.record_contribution(amount)?;
    let issued = conversion::to_issued(
        amount,
        launch.target_contribution,
        launch.distribution_supply,
    )?;
    let total_contributions = launch.total_contributions;

    emit!(ContributionReceived {
        launch_id,
        contributor: ctx.accounts.contributor.key(),
        amount,
        issued,
        total_contributions,
        comment,
    });

    let mut ctx = ctx;
    if finalizes {
        finalize(&mut ctx, launch_id)?;
    }

    // contributor payout happens last
    let launch_id_bytes = launch_id.to_le_bytes();
    let launch_bump = ctx.accounts.launch.bump;
    let launch_seeds: &[&[u8]] = &[LAUNCH_SEED, &launch_id_bytes, &[launch_bump]];

    if ctx.accounts.contributor_token_account.state == AccountState::Frozen {
        token::thaw_account(CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            ThawAccount {
                account: ctx.accounts.contributor_token_account.to_account_info(),
                mint: ctx.accounts.mint.to_account_info(),
                authority: ctx.accounts.launch.to_account_info(),
            },
            &[launch_seeds],
        ))?;
    }
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.launch_vault.to_account_info(),
                to: ctx.accounts.contributor_token_account.to_account_info(),
                authority: ctx.accounts.launch.to_account_info(),
            },
            &[launch_seeds],
        ),
        issued,
    )?;
    if !finalizes {
        // reseal the ledger while Active; once Finalized the balance is
        // freely transferable
        token::freeze_account(CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            FreezeAccount {
                account: ctx.accounts.contributor_token_account.to_account_info(),
                mint: ctx.accounts.mint.to_account_info(),
                authority: ctx.accounts.launch.to_account_info(),
            },
            &[launch_seeds],
        ))?;
    }

    Ok(())
}

// =============================================================================
// FINALIZATION
// =============================================================================

/// One-shot, all-or-nothing finalization. Runs only inside the contribution
/// that completed the target; any failure unwinds the whole contribution.
fn finalize<'info>(
    ctx: &mut Context<'_, '_, '_, 'info, Contribute<'info>>,
    launch_id: u64,
) -> Result<()> {
    let config = &ctx.accounts.protocol_config;

    let fee_recipient = ctx
        .accounts
        .fee_recipient
        .as_ref()
        .ok_or(LaunchpadError::MissingFinalizationAccounts)?;
    let pool_venue_program = ctx
        .accounts
        .pool_venue_program
        .as_ref()
        .ok_or(LaunchpadError::MissingFinalizationAccounts)?;
    let position_mint = ctx
        .accounts
        .position_mint
        .as_ref()
        .ok_or(LaunchpadError::MissingFinalizationAccounts)?;
    let locker = ctx
        .accounts
        .locker
        .as_ref()
        .ok_or(LaunchpadError::MissingFinalizationAccounts)?;
    let lock_record = ctx
        .accounts
        .lock_record
        .as_ref()
        .ok_or(LaunchpadError::MissingFinalizationAccounts)?;

    require_keys_eq!(
        fee_recipient.key(),
        config.fee_recipient,
        LaunchpadError::InvalidVault
    );
    require_keys_eq!(
        pool_venue_program.key(),
        config.pool_venue_program,
        LaunchpadError::UnexpectedVenue
    );
    let expected_locker = Pubkey::create_program_address(
        &[LOCKER_SEED, &[config.locker_bump]],
        &crate::ID,
    )
    .map_err(|_| error!(LaunchpadError::InvalidVault))?;
    require_keys_eq!(locker.key(), expected_locker, LaunchpadError::InvalidVault);

    let locker_flat_fee = config.locker_flat_fee;
    let max_fee_recipients = config.max_fee_recipients;
    let (finalization_fee, pool_amount) = ctx
        .accounts
        .launch
        .finalization_amounts(locker_flat_fee)?;

    let launch_id_bytes = launch_id.to_le_bytes();
    let launch_bump = ctx.accounts.launch.bump;
    let sol_vault_bump = ctx.accounts.launch.sol_vault_bump;
    let launch_seeds: &[&[u8]] = &[LAUNCH_SEED, &launch_id_bytes, &[launch_bump]];
    let sol_vault_seeds: &[&[u8]] = &[SOL_VAULT_SEED, &launch_id_bytes, &[sol_vault_bump]];

    // 1. seed the pool: pool_amount lamports + the pool supply allocation
    //    into a fresh full-range position owned by the locker
    let pool_supply = ctx.accounts.launch.pool_supply;
    venue::create_pool_with_position(
        venue::CreatePoolWithPosition {
            venue_program: &pool_venue_program.to_account_info(),
            payer: &ctx.accounts.sol_vault.to_account_info(),
            token_source: &ctx.accounts.launch_vault.to_account_info(),
            token_source_authority: &ctx.accounts.launch.to_account_info(),
            token_mint: &ctx.accounts.mint.to_account_info(),
            position_mint: &position_mint.to_account_info(),
            position_owner: &locker.to_account_info(),
            token_program: &ctx.accounts.token_program.to_account_info(),
            system_program: &ctx.accounts.system_program.to_account_info(),
            passthrough: ctx.remaining_accounts,
        },
        pool_amount,
        pool_supply,
        &[sol_vault_seeds, launch_seeds],
    )?;

    // 2. finalization fee to the protocol
    if finalization_fee > 0 {
        system_program::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: ctx.accounts.sol_vault.to_account_info(),
                    to: fee_recipient.to_account_info(),
                },
                &[sol_vault_seeds],
            ),
            finalization_fee,
        )?;
    }

    // 3. reserved allocation to its recipient
    let reserved_supply = ctx.accounts.launch.reserved_supply;
    if reserved_supply > 0 {
        let reserved_account = ctx
            .accounts
            .reserved_recipient_token_account
            .as_ref()
            .ok_or(LaunchpadError::MissingFinalizationAccounts)?;
        let reserved_recipient = ctx
            .accounts
            .launch
            .reserved_recipient
            .ok_or(LaunchpadError::MissingReservedRecipient)?;
        require_keys_eq!(
            reserved_account.mint,
            ctx.accounts.launch.mint,
            LaunchpadError::InvalidRecipientAccount
        );
        require_keys_eq!(
            reserved_account.owner,
            reserved_recipient,
            LaunchpadError::InvalidRecipientAccount
        );

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.launch_vault.to_account_info(),
                    to: reserved_account.to_account_info(),
                    authority: ctx.accounts.launch.to_account_info(),
                },
                &[launch_seeds],
            ),
            reserved_supply,
        )?;

        emit!(ReservedSupplyTransferred {
            launch_id,
            recipient: reserved_recipient,
            amount: reserved_supply,
        });
    }

    // 4. one-way success flag
    ctx.accounts.launch.mark_succeeded()?;

    // 5. flat lock fee to the locker
    if locker_flat_fee > 0 {
        system_program::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: ctx.accounts.sol_vault.to_account_info(),
                    to: locker.to_account_info(),
                },
                &[sol_vault_seeds],
            ),
            locker_flat_fee,
        )?;
    }

    // 6. register the lock record for perpetual fee distribution
    let fee_split = ctx.accounts.launch.fee_split.clone();
    fee_split.validate(max_fee_recipients)?;

    let (expected_record, record_bump) = Pubkey::find_program_address(
        &[LOCK_RECORD_SEED, position_mint.key().as_ref()],
        &crate::ID,
    );
    require_keys_eq!(
        lock_record.key(),
        expected_record,
        LaunchpadError::InvalidLockRecord
    );

    let rent = Rent::get()?;
    let position_mint_key = position_mint.key();
    let record_seeds: &[&[u8]] = &[
        LOCK_RECORD_SEED,
        position_mint_key.as_ref(),
        &[record_bump],
    ];

    // the record address is derivable before this transaction lands, so a
    // stranger may have parked lamports there; top up to rent exemption and
    // allocate in place instead of requiring an empty account
    let shortfall =
        LockRecord::rent_shortfall(rent.minimum_balance(LockRecord::LEN), lock_record.lamports());
    if shortfall > 0 {
        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: ctx.accounts.contributor.to_account_info(),
                    to: lock_record.to_account_info(),
                },
            ),
            shortfall,
        )?;
    }
    system_program::allocate(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            system_program::Allocate {
                account_to_allocate: lock_record.to_account_info(),
            },
            &[record_seeds],
        ),
        LockRecord::LEN as u64,
    )?;
    system_program::assign(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            system_program::Assign {
                account_to_assign: lock_record.to_account_info(),
            },
            &[record_seeds],
        ),
        &crate::ID,
    )?;

    let record = LockRecord {
        launch_id,
        position_mint: position_mint_key,
        token_a_mint: native_mint::ID,
        token_b_mint: ctx.accounts.launch.mint,
        fee_split: fee_split.clone(),
        bump: record_bump,
        reserved: [0u8; 32],
    };
    let mut data = lock_record.try_borrow_mut_data()?;
    record.try_serialize(&mut &mut data[..])?;
    drop(data);

    msg!("Launch #{} finalized, position {}", launch_id, position_mint_key);

    emit!(FeeSplitRegistered {
        launch_id,
        position_mint: position_mint_key,
        token_a_mint: native_mint::ID,
        token_b_mint: ctx.accounts.launch.mint,
        fee_split,
    });
    emit!(LaunchFinalized {
        launch_id,
        position_mint: position_mint_key,
        pool_amount,
        pool_supply,
        finalization_fee,
        locker_flat_fee,
    });

    Ok(())
}
