/**
 * External Pool Venue Interface
 *
 * The engine depends on the venue's documented call contract only. Both
 * calls are built by hand and dispatched with `invoke_signed`; the venue's
 * own accounts (pool, position, position token account, internal vaults)
 * are passed through opaquely in the order the venue documents.
 *
 * Call contract:
 *
 * `create_pool_with_position(lamports, token_amount)` creates the pool for
 * (native SOL, token_mint) if needed, wraps the lamports drawn from `payer`,
 * deposits both sides into a freshly minted full-range position, and
 * delivers the position NFT (`position_mint`, supply 1) to
 * `position_owner`.
 *
 * `collect_position_fees(max_a, max_b)` moves all fees accrued by the
 * position into `recipient_a` / `recipient_b`, which must be token accounts
 * for the pool's two sides. Collecting with nothing accrued is a no-op.
 */

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;

pub const CREATE_POOL_WITH_POSITION_DISCRIMINATOR: [u8; 8] =
    [214, 27, 225, 13, 139, 69, 215, 158];
pub const COLLECT_POSITION_FEES_DISCRIMINATOR: [u8; 8] = [246, 151, 204, 127, 228, 68, 185, 211];

#[derive(AnchorSerialize)]
struct CreatePoolWithPositionArgs {
    lamports: u64,
    token_amount: u64,
}

#[derive(AnchorSerialize)]
struct CollectPositionFeesArgs {
    max_a: u64,
    max_b: u64,
}

pub struct CreatePoolWithPosition<'a, 'info> {
    pub venue_program: &'a AccountInfo<'info>,
    /// Lamport source for the pool deposit; signs via seeds
    pub payer: &'a AccountInfo<'info>,
    /// Token source for the pool deposit
    pub token_source: &'a AccountInfo<'info>,
    /// Authority over `token_source`; signs via seeds
    pub token_source_authority: &'a AccountInfo<'info>,
    pub token_mint: &'a AccountInfo<'info>,
    /// Fresh keypair; becomes the position NFT mint
    pub position_mint: &'a AccountInfo<'info>,
    /// Receives the position NFT
    pub position_owner: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
    /// Venue-internal accounts, in the venue's documented order
    pub passthrough: &'a [AccountInfo<'info>],
}

pub fn create_pool_with_position(
    accounts: CreatePoolWithPosition,
    lamports: u64,
    token_amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let mut data = CREATE_POOL_WITH_POSITION_DISCRIMINATOR.to_vec();
    CreatePoolWithPositionArgs {
        lamports,
        token_amount,
    }
    .serialize(&mut data)?;

    let mut metas = vec![
        AccountMeta::new(*accounts.payer.key, true),
        AccountMeta::new(*accounts.token_source.key, false),
        AccountMeta::new_readonly(*accounts.token_source_authority.key, true),
        AccountMeta::new_readonly(*accounts.token_mint.key, false),
        AccountMeta::new(*accounts.position_mint.key, true),
        AccountMeta::new_readonly(*accounts.position_owner.key, false),
        AccountMeta::new_readonly(*accounts.token_program.key, false),
        AccountMeta::new_readonly(*accounts.system_program.key, false),
    ];
    let mut infos = vec![
        accounts.payer.clone(),
        accounts.token_source.clone(),
        accounts.token_source_authority.clone(),
        accounts.token_mint.clone(),
        accounts.position_mint.clone(),
        accounts.position_owner.clone(),
        accounts.token_program.clone(),
        accounts.system_program.clone(),
    ];
    for acc in accounts.passthrough {
        metas.push(AccountMeta::new(*acc.key, false));
        infos.push(acc.clone());
    }

    let ix = Instruction {
        program_id: *accounts.venue_program.key,
        accounts: metas,
        data,
    };
    invoke_signed(&ix, &infos, signer_seeds)?;
    Ok(())
}

pub struct CollectPositionFees<'a, 'info> {
    pub venue_program: &'a AccountInfo<'info>,
    pub position_mint: &'a AccountInfo<'info>,
    /// Position owner; signs via seeds
    pub position_owner: &'a AccountInfo<'info>,
    pub recipient_a: &'a AccountInfo<'info>,
    pub recipient_b: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    /// Venue-internal accounts, in the venue's documented order
    pub passthrough: &'a [AccountInfo<'info>],
}

pub fn collect_position_fees(
    accounts: CollectPositionFees,
    max_a: u64,
    max_b: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let mut data = COLLECT_POSITION_FEES_DISCRIMINATOR.to_vec();
    CollectPositionFeesArgs { max_a, max_b }.serialize(&mut data)?;

    let mut metas = vec![
        AccountMeta::new_readonly(*accounts.position_mint.key, false),
        AccountMeta::new_readonly(*accounts.position_owner.key, true),
        AccountMeta::new(*accounts.recipient_a.key, false),
        AccountMeta::new(*accounts.recipient_b.key, false),
        AccountMeta::new_readonly(*accounts.token_program.key, false),
    ];
    let mut infos = vec![
        accounts.position_mint.clone(),
        accounts.position_owner.clone(),
        accounts.recipient_a.clone(),
        accounts.recipient_b.clone(),
        accounts.token_program.clone(),
    ];
    for acc in accounts.passthrough {
        metas.push(AccountMeta::new(*acc.key, false));
        infos.push(acc.clone());
    }

    let ix = Instruction {
        program_id: *accounts.venue_program.key,
        accounts: metas,
        data,
    };
    invoke_signed(&ix, &infos, signer_seeds)?;
    Ok(())
}
