//! Error definitions for the vault token program.

use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Vault is paused")]
    VaultPaused,

    #[msg("Operation requires the vault to be paused")]
    VaultNotPaused,

    #[msg("Reentrant call")]
    ReentrantCall,

    #[msg("Amount must be non-zero")]
    InvalidAmount,

    #[msg("Invalid address")]
    InvalidAddress,

    #[msg("Percentage exceeds 100")]
    InvalidPercentage,

    #[msg("Invalid mint")]
    InvalidMint,

    #[msg("Invalid token program")]
    InvalidTokenProgram,

    #[msg("Invalid yield vault account")]
    InvalidYieldVaultAccount,

    #[msg("Requested assets exceed withdrawable liquidity")]
    AssetsTooLarge,

    #[msg("Claim token balance cannot cover this redemption")]
    InsufficientShares,

    #[msg("No yield to collect")]
    NoYield,

    #[msg("Reserve already at target")]
    NoNeedToReplenishReserve,

    #[msg("Reserve below target but the yield vault has no liquidity")]
    YieldVaultIlliquid,

    #[msg("Migration fees fund cannot cover the discrepancy")]
    CannotCompleteMigration,

    #[msg("Shares must be non-zero")]
    ZeroShares,

    #[msg("Origin ledger id equals this ledger")]
    InvalidLedgerId,

    #[msg("Yield vault burned more shares than the slippage tolerance allows")]
    ExcessiveYieldVaultSharesBurned,

    #[msg("Yield vault minted fewer shares than the slippage tolerance allows")]
    InsufficientYieldVaultSharesMinted,

    #[msg("Measured assets received do not cover the requested shares")]
    InsufficientAssetsReceived,

    #[msg("Migration inbox does not hold the expected asset leg")]
    MigrationInboxShortfall,

    #[msg("Malformed cross-ledger instruction payload")]
    InvalidInstructionPayload,
}
