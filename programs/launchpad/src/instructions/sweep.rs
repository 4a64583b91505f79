/**
 * Sweep Instruction
 *
 * The locker authority accumulates lamports it has no use for: the flat
 * lock fee from every finalization plus anything sent to it directly. The
 * admin may drain the balance to a recipient of their choosing. Token
 * treasuries are untouched; fee distribution owns those.
 */

use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::state::ProtocolConfig;
use crate::{LaunchpadError, LockerSwept, LOCKER_SEED, PROTOCOL_CONFIG_SEED};

#[derive(Accounts)]
pub struct Sweep<'info> {
    #[account(
        constraint = admin.key() == protocol_config.admin @ LaunchpadError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [PROTOCOL_CONFIG_SEED],
        bump = protocol_config.bump,
    )]
    pub protocol_config: Account<'info, ProtocolConfig>,

    #[account(
        mut,
        seeds = [LOCKER_SEED],
        bump = protocol_config.locker_bump,
    )]
    pub locker: SystemAccount<'info>,

    /// CHECK: destination chosen by the admin
    #[account(mut)]
    pub recipient: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Validated drain amount: the entire stray balance, to a non-null recipient
fn sweep_amount(recipient: &Pubkey, locker_balance: u64) -> Result<u64> {
    require!(*recipient != Pubkey::default(), LaunchpadError::NullRecipient);
    require!(locker_balance > 0, LaunchpadError::NothingToWithdraw);
    Ok(locker_balance)
}

pub fn handler(ctx: Context<Sweep>) -> Result<()> {
    let amount = sweep_amount(
        &ctx.accounts.recipient.key(),
        ctx.accounts.locker.lamports(),
    )?;

    let locker_bump = ctx.accounts.protocol_config.locker_bump;
    let locker_seeds: &[&[u8]] = &[LOCKER_SEED, &[locker_bump]];

    system_program::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.locker.to_account_info(),
                to: ctx.accounts.recipient.to_account_info(),
            },
            &[locker_seeds],
        ),
        amount,
    )?;

    msg!("Swept {} lamports from the locker", amount);

    emit!(LockerSwept {
        recipient: ctx.accounts.recipient.key(),
        amount,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_recipient_rejected() {
        assert_eq!(
            sweep_amount(&Pubkey::default(), 1_000),
            Err(LaunchpadError::NullRecipient.into())
        );
    }

    #[test]
    fn drains_exactly_the_stray_balance() {
        let recipient = Pubkey::new_unique();

        // the full balance leaves, nothing stays behind
        assert_eq!(sweep_amount(&recipient, 1_000).unwrap(), 1_000);
        assert_eq!(sweep_amount(&recipient, 1).unwrap(), 1);

        // an empty locker has nothing to drain
        assert_eq!(
            sweep_amount(&recipient, 0),
            Err(LaunchpadError::NothingToWithdraw.into())
        );
    }
}
