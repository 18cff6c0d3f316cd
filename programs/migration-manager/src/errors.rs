//! Error definitions for the migration manager program.

use anchor_lang::prelude::*;

#[error_code]
pub enum ManagerError {
    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Manager is paused")]
    ManagerPaused,

    #[msg("No enabled token pair for this origin")]
    UnknownTokenPair,

    #[msg("Origin ledger id equals this ledger")]
    InvalidLedgerId,

    #[msg("Invalid address")]
    InvalidAddress,

    #[msg("Shares must be non-zero")]
    ZeroShares,

    #[msg("Malformed cross-ledger instruction payload")]
    InvalidInstructionPayload,
}
