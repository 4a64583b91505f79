/**
 * State Accounts
 */

pub mod fee_split;
pub mod launch;
pub mod lock_record;
pub mod protocol_config;

pub use fee_split::*;
pub use launch::*;
pub use lock_record::*;
pub use protocol_config::*;
