//! Event definitions for the native converter program.

use anchor_lang::prelude::*;

/// Emitted when a converter is initialized.
#[event]
pub struct ConverterInitialized {
    pub converter: Pubkey,
    pub underlying_mint: Pubkey,
    pub local_mint: Pubkey,
    pub destination_ledger_id: u32,
    pub non_migratable_percentage: u8,
    pub admin: Pubkey,
    pub timestamp: i64,
}

/// Emitted when local backing is converted into claim tokens.
#[event]
pub struct Converted {
    pub converter: Pubkey,
    pub depositor: Pubkey,
    pub receiver: Pubkey,
    /// Post-fee backing actually received
    pub assets_received: u64,
    pub tokens_minted: u64,
    pub timestamp: i64,
}

/// Emitted when claim tokens are burned back into local backing.
#[event]
pub struct Deconverted {
    pub converter: Pubkey,
    pub owner: Pubkey,
    pub receiver: Pubkey,
    pub tokens_burned: u64,
    pub assets_paid: u64,
    pub timestamp: i64,
}

/// Emitted when backing leaves for the main-ledger vault.
#[event]
pub struct BackingMigrated {
    pub converter: Pubkey,
    pub destination_ledger_id: u32,
    pub amount: u64,
    /// Backing left local after this migration
    pub remaining_backing: u64,
    pub total_migrated: u64,
    pub timestamp: i64,
}

/// Emitted when the non-migratable percentage is updated.
#[event]
pub struct NonMigratablePercentageUpdated {
    pub converter: Pubkey,
    pub old_percentage: u8,
    pub new_percentage: u8,
    pub timestamp: i64,
}

/// Emitted when the converter is paused.
#[event]
pub struct ConverterPausedEvent {
    pub converter: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}

/// Emitted when the converter is unpaused.
#[event]
pub struct ConverterUnpausedEvent {
    pub converter: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}
