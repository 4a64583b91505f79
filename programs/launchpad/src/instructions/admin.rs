/**
 * Protocol Administration Instructions
 */

use anchor_lang::prelude::*;

use crate::{
    state::ProtocolConfig, AdminTransferred, LaunchpadError, ProtocolInitialized,
    ProtocolParamsUpdated, LOCKER_SEED, MAX_FEE_RECIPIENTS, PROTOCOL_CONFIG_SEED,
};

// =============================================================================
// INITIALIZE PROTOCOL
// =============================================================================

#[derive(Accounts)]
pub struct InitializeProtocol<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = ProtocolConfig::LEN,
        seeds = [PROTOCOL_CONFIG_SEED],
        bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    /// CHECK: fee destination, recorded as-is
    pub fee_recipient: UncheckedAccount<'info>,

    /// CHECK: external pool venue program id, recorded as-is
    pub pool_venue_program: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_protocol_handler(
    ctx: Context<InitializeProtocol>,
    locker_flat_fee: u64,
    max_fee_recipients: u8,
) -> Result<()> {
    require!(
        max_fee_recipients >= 1 && (max_fee_recipients as usize) <= MAX_FEE_RECIPIENTS,
        LaunchpadError::TooManyFeeRecipients
    );
    require!(
        ctx.accounts.fee_recipient.key() != Pubkey::default(),
        LaunchpadError::NullRecipient
    );

    let (_, locker_bump) = Pubkey::find_program_address(&[LOCKER_SEED], &crate::ID);

    let config = &mut ctx.accounts.protocol_config;
    config.admin = ctx.accounts.admin.key();
    config.fee_recipient = ctx.accounts.fee_recipient.key();
    config.pool_venue_program = ctx.accounts.pool_venue_program.key();
    config.locker_flat_fee = locker_flat_fee;
    config.max_fee_recipients = max_fee_recipients;
    config.launch_count = 0;
    config.locker_bump = locker_bump;
    config.bump = ctx.bumps.protocol_config;

    emit!(ProtocolInitialized {
        admin: config.admin,
        fee_recipient: config.fee_recipient,
        pool_venue_program: config.pool_venue_program,
        locker_flat_fee,
        max_fee_recipients,
    });

    Ok(())
}

// =============================================================================
// UPDATE PARAMETERS
// =============================================================================

#[derive(Accounts)]
pub struct UpdateProtocolParams<'info> {
    #[account(
        constraint = admin.key() == protocol_config.admin @ LaunchpadError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [PROTOCOL_CONFIG_SEED],
        bump = protocol_config.bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,
}

pub fn update_protocol_params_handler(
    ctx: Context<UpdateProtocolParams>,
    new_fee_recipient: Option<Pubkey>,
    new_locker_flat_fee: Option<u64>,
    new_max_fee_recipients: Option<u8>,
) -> Result<()> {
    let config = &mut ctx.accounts.protocol_config;

    if let Some(recipient) = new_fee_recipient {
        require!(recipient != Pubkey::default(), LaunchpadError::NullRecipient);
        config.fee_recipient = recipient;
    }
    if let Some(flat_fee) = new_locker_flat_fee {
        config.locker_flat_fee = flat_fee;
    }
    if let Some(max) = new_max_fee_recipients {
        require!(
            max >= 1 && (max as usize) <= MAX_FEE_RECIPIENTS,
            LaunchpadError::TooManyFeeRecipients
        );
        config.max_fee_recipients = max;
    }

    emit!(ProtocolParamsUpdated {
        fee_recipient: config.fee_recipient,
        locker_flat_fee: config.locker_flat_fee,
        max_fee_recipients: config.max_fee_recipients,
    });

    Ok(())
}

// =============================================================================
// TRANSFER ADMIN
// =============================================================================

#[derive(Accounts)]
pub struct TransferAdmin<'info> {
    #[account(
        constraint = current_admin.key() == protocol_config.admin @ LaunchpadError::Unauthorized
    )]
    pub current_admin: Signer<'info>,

    #[account(
        mut,
        seeds = [PROTOCOL_CONFIG_SEED],
        bump = protocol_config.bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    /// CHECK: new admin key, recorded as-is
    pub new_admin: UncheckedAccount<'info>,
}

pub fn transfer_admin_handler(ctx: Context<TransferAdmin>) -> Result<()> {
    require!(
        ctx.accounts.new_admin.key() != Pubkey::default(),
        LaunchpadError::NullRecipient
    );

    let config = &mut ctx.accounts.protocol_config;
    let old_admin = config.admin;
    config.admin = ctx.accounts.new_admin.key();

    msg!("Admin transferred: {} -> {}", old_admin, config.admin);

    emit!(AdminTransferred {
        old_admin,
        new_admin: config.admin,
    });

    Ok(())
}
