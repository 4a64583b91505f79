/**
 * Launchpad
 *
 * Two-phase fundraising and liquidity bootstrapping: contributors fund a
 * launch in SOL toward a fixed target and receive the issued token at a
 * fixed conversion ratio; hitting the target atomically seeds a full-range
 * liquidity position, locks it forever, and splits its trading fees between
 * the launch's fee owner and a weighted list of secondary recipients.
 */

use anchor_lang::prelude::*;

pub mod conversion;
pub mod instructions;
pub mod merkle;
pub mod state;
pub mod venue;

use instructions::*;
use state::*;

declare_id!("H3hK5Ge8PwKETty5uS6p4kcAvL922QZy6Td3baqWL6yh");

// =============================================================================
// SEEDS
// =============================================================================

pub const PROTOCOL_CONFIG_SEED: &[u8] = b"protocol_config";
pub const LAUNCH_SEED: &[u8] = b"launch";
pub const SOL_VAULT_SEED: &[u8] = b"sol_vault";
pub const LOCKER_SEED: &[u8] = b"locker";
pub const LOCK_RECORD_SEED: &[u8] = b"lock_record";

// =============================================================================
// CONSTANTS
// =============================================================================

/// Basis points denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Maximum finalization / withdrawal fee: 2.5% (250 bps)
pub const MAX_FEE_BPS: u16 = 250;

/// Minimum funding target: 0.1 SOL
/// Keeps the pool deposit strictly positive after the finalization fee and
/// the flat lock fee are carved out.
pub const MIN_TARGET_CONTRIBUTION: u64 = 100_000_000;

/// Hard cap on secondary fee recipients per launch (account space bound).
/// The runtime maximum is configured in `ProtocolConfig` and must not
/// exceed this.
pub const MAX_FEE_RECIPIENTS: usize = 8;

/// Maximum length of a contribution / opening comment
pub const MAX_COMMENT_LEN: usize = 256;

// =============================================================================
// PROGRAM
// =============================================================================

#[program]
pub mod launchpad {
    use super::*;

    // =========================================================================
    // PROTOCOL ADMINISTRATION
    // =========================================================================

    /// Initialize the protocol config singleton
    pub fn initialize_protocol(
        ctx: Context<InitializeProtocol>,
        locker_flat_fee: u64,
        max_fee_recipients: u8,
    ) -> Result<()> {
        instructions::admin::initialize_protocol_handler(ctx, locker_flat_fee, max_fee_recipients)
    }

    /// Update tunable protocol parameters (admin only)
    pub fn update_protocol_params(
        ctx: Context<UpdateProtocolParams>,
        new_fee_recipient: Option<Pubkey>,
        new_locker_flat_fee: Option<u64>,
        new_max_fee_recipients: Option<u8>,
    ) -> Result<()> {
        instructions::admin::update_protocol_params_handler(
            ctx,
            new_fee_recipient,
            new_locker_flat_fee,
            new_max_fee_recipients,
        )
    }

    /// Hand the protocol admin role to a new key
    pub fn transfer_admin(ctx: Context<TransferAdmin>) -> Result<()> {
        instructions::admin::transfer_admin_handler(ctx)
    }

    // =========================================================================
    // LAUNCH LIFECYCLE
    // =========================================================================

    /// Create a launch: issue the token, assign the next id, persist the
    /// economic parameters, optionally contribute on behalf of the creator
    pub fn create_launch(
        ctx: Context<CreateLaunch>,
        asset_params: AssetParams,
        launch_params: LaunchParams,
        opening_comment: Option<String>,
        initial_contribution: u64,
    ) -> Result<()> {
        instructions::create_launch::handler(
            ctx,
            asset_params,
            launch_params,
            opening_comment,
            initial_contribution,
        )
    }

    /// Contribute SOL to an active launch. The contribution that exactly
    /// completes the target finalizes the launch in the same instruction
    /// and must carry the finalization account set.
    pub fn contribute<'info>(
        ctx: Context<'_, '_, '_, 'info, Contribute<'info>>,
        launch_id: u64,
        amount: u64,
        comment: Option<String>,
        allowlist_proof: Option<Vec<[u8; 32]>>,
    ) -> Result<()> {
        instructions::contribute::handler(ctx, launch_id, amount, comment, allowlist_proof)
    }

    /// Ragequit: return the caller's entire issued balance for a pro-rata
    /// SOL refund minus the withdrawal fee. Active launches only.
    pub fn withdraw(ctx: Context<Withdraw>, launch_id: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, launch_id)
    }

    /// Thaw a contributor token account once the launch is finalized.
    /// Permissionless and idempotent.
    pub fn unlock_tokens(ctx: Context<UnlockTokens>, launch_id: u64) -> Result<()> {
        instructions::unlock_tokens::handler(ctx, launch_id)
    }

    // =========================================================================
    // FEE DISTRIBUTION
    // =========================================================================

    /// Pull all accrued fees from a locked position and pay them out to the
    /// registered recipients and the current fee owner. Anyone may call.
    pub fn collect_fees<'info>(ctx: Context<'_, '_, 'info, 'info, CollectFees<'info>>) -> Result<()> {
        instructions::collect_fees::handler(ctx)
    }

    /// Drain stray lamports accumulated by the locker authority (admin only)
    pub fn sweep(ctx: Context<Sweep>) -> Result<()> {
        instructions::sweep::handler(ctx)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[error_code]
pub enum LaunchpadError {
    #[msg("Fee rate exceeds the allowed maximum (250 bps)")]
    InvalidFeeRate,

    #[msg("Supply allocations must sum to the total supply")]
    InvalidSupplyAllocation,

    #[msg("Funding target is below the minimum")]
    TargetTooSmall,

    #[msg("At least one secondary fee recipient is required")]
    NoFeeRecipients,

    #[msg("Too many secondary fee recipients")]
    TooManyFeeRecipients,

    #[msg("Recipient address cannot be the null address")]
    NullRecipient,

    #[msg("Per-side fee weights exceed 10000 bps")]
    WeightSumExceeded,

    #[msg("Reserved allocation requires a reserved recipient")]
    MissingReservedRecipient,

    #[msg("Allowlist proof missing or invalid")]
    InvalidAllowlistProof,

    #[msg("Comment exceeds the maximum length")]
    CommentTooLong,

    #[msg("Launch is not active")]
    LaunchNotActive,

    #[msg("Launch is not finalized")]
    LaunchNotFinalized,

    #[msg("Launch already marked as succeeded")]
    AlreadySucceeded,

    #[msg("Contribution amount cannot be zero")]
    ZeroContribution,

    #[msg("Contribution exceeds the per-address cap")]
    ContributionCapExceeded,

    #[msg("Contribution exceeds the remaining target headroom")]
    TargetHeadroomExceeded,

    #[msg("A creation-time contribution must stay below the target")]
    InitialContributionTooLarge,

    #[msg("The completing contribution requires the finalization accounts")]
    MissingFinalizationAccounts,

    #[msg("Pool deposit would be zero after fees")]
    PoolAmountTooSmall,

    #[msg("Nothing to withdraw")]
    NothingToWithdraw,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Unexpected external venue account")]
    UnexpectedVenue,

    #[msg("Invalid vault account")]
    InvalidVault,

    #[msg("Invalid lock record account")]
    InvalidLockRecord,

    #[msg("Recipient token account does not match the registered recipient")]
    InvalidRecipientAccount,

    #[msg("Fee owner token account does not hold the ownership token")]
    InvalidFeeOwner,

    #[msg("Math overflow")]
    MathOverflow,
}

// =============================================================================
// EVENTS
// =============================================================================

#[event]
pub struct ProtocolInitialized {
    pub admin: Pubkey,
    pub fee_recipient: Pubkey,
    pub pool_venue_program: Pubkey,
    pub locker_flat_fee: u64,
    pub max_fee_recipients: u8,
}

#[event]
pub struct ProtocolParamsUpdated {
    pub fee_recipient: Pubkey,
    pub locker_flat_fee: u64,
    pub max_fee_recipients: u8,
}

#[event]
pub struct AdminTransferred {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
}

#[event]
pub struct LaunchCreated {
    pub launch_id: u64,
    pub creator: Pubkey,
    pub mint: Pubkey,
    pub ownership_mint: Pubkey,
    pub asset_params: AssetParams,
    pub launch_params: LaunchParams,
    pub opening_comment: Option<String>,
}

#[event]
pub struct ContributionReceived {
    pub launch_id: u64,
    pub contributor: Pubkey,
    pub amount: u64,
    pub issued: u64,
    pub total_contributions: u64,
    pub comment: Option<String>,
}

#[event]
pub struct ContributionWithdrawn {
    pub launch_id: u64,
    pub contributor: Pubkey,
    pub receiver: Pubkey,
    pub issued_returned: u64,
    pub gross_amount: u64,
    pub fee: u64,
}

#[event]
pub struct LaunchFinalized {
    pub launch_id: u64,
    pub position_mint: Pubkey,
    pub pool_amount: u64,
    pub pool_supply: u64,
    pub finalization_fee: u64,
    pub locker_flat_fee: u64,
}

#[event]
pub struct ReservedSupplyTransferred {
    pub launch_id: u64,
    pub recipient: Pubkey,
    pub amount: u64,
}

#[event]
pub struct FeeSplitRegistered {
    pub launch_id: u64,
    pub position_mint: Pubkey,
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub fee_split: FeeSplitSpec,
}

#[event]
pub struct FeesCollected {
    pub position_mint: Pubkey,
    pub gross_a: u64,
    pub gross_b: u64,
    pub fee_owner: Pubkey,
    pub recipients_paid: u8,
}

#[event]
pub struct TokensUnlocked {
    pub launch_id: u64,
    pub token_account: Pubkey,
}

#[event]
pub struct LockerSwept {
    pub recipient: Pubkey,
    pub amount: u64,
}
