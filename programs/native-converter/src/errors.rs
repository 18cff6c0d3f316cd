//! Error definitions for the native converter program.

use anchor_lang::prelude::*;

#[error_code]
pub enum ConverterError {
    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Converter is paused")]
    ConverterPaused,

    #[msg("Amount must be non-zero")]
    InvalidAmount,

    #[msg("Invalid address")]
    InvalidAddress,

    #[msg("Percentage exceeds 100")]
    InvalidPercentage,

    #[msg("Invalid mint")]
    InvalidMint,

    #[msg("Local backing cannot cover this deconversion")]
    InsufficientBacking,

    #[msg("No backing is migratable right now")]
    NothingToMigrate,
}
