/**
 * Instruction Handlers
 */

pub mod admin;
pub mod collect_fees;
pub mod contribute;
pub mod create_launch;
pub mod sweep;
pub mod unlock_tokens;
pub mod withdraw;

pub use admin::*;
pub use collect_fees::*;
pub use contribute::*;
pub use create_launch::*;
pub use sweep::*;
pub use unlock_tokens::*;
pub use withdraw::*;
