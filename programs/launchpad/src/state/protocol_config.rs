/**
 * Protocol Configuration State
 */

use anchor_lang::prelude::*;

/// Singleton config account. Holds the admin keys, the external venue
/// identity, the tunable fee parameters, and the launch id counter.
#[account]
pub struct ProtocolConfig {
    /// Admin who can update parameters (transferable)
    pub admin: Pubkey,

    /// Destination for finalization and withdrawal fees
    pub fee_recipient: Pubkey,

    /// External pool venue program this engine is allowed to call
    pub pool_venue_program: Pubkey,

    /// Flat lock fee in lamports, forwarded to the locker at finalization
    pub locker_flat_fee: u64,

    /// Runtime cap on secondary fee recipients per launch
    pub max_fee_recipients: u8,

    /// Number of launches created; the next launch id is `launch_count + 1`
    /// (ids start at 1 and are never reused)
    pub launch_count: u64,

    /// Bump of the locker authority PDA
    pub locker_bump: u8,

    /// Bump seed for this PDA
    pub bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 64],
}

impl ProtocolConfig {
    pub const LEN: usize = 8 + // discriminator
        32 + // admin
        32 + // fee_recipient
        32 + // pool_venue_program
        8 +  // locker_flat_fee
        1 +  // max_fee_recipients
        8 +  // launch_count
        1 +  // locker_bump
        1 +  // bump
        64;  // reserved

    pub fn next_launch_id(&self) -> u64 {
        self.launch_count + 1
    }
}
