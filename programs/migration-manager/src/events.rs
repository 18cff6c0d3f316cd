//! Event definitions for the migration manager program.

use anchor_lang::prelude::*;

use crate::state::FundingSource;

/// Emitted when the manager is initialized.
#[event]
pub struct ManagerInitialized {
    pub manager: Pubkey,
    pub admin: Pubkey,
    pub ledger_id: u32,
    pub timestamp: i64,
}

/// Emitted when a converter routing entry is set or updated.
#[event]
pub struct TokenPairConfigured {
    pub manager: Pubkey,
    pub origin_ledger_id: u32,
    pub converter: [u8; 32],
    pub vault: Pubkey,
    pub funding_source: FundingSource,
    pub enabled: bool,
    pub timestamp: i64,
}

/// Emitted when a migration message is routed into its vault.
#[event]
pub struct MigrationRouted {
    pub manager: Pubkey,
    pub origin_ledger_id: u32,
    pub converter: [u8; 32],
    pub vault: Pubkey,
    pub shares: u64,
    pub assets: u64,
    pub funded: u64,
    pub timestamp: i64,
}

/// Emitted when a custom message arrives for an origin the manager knows;
/// left to off-chain consumers.
#[event]
pub struct CustomMessageReceived {
    pub manager: Pubkey,
    pub origin_ledger_id: u32,
    pub origin_address: [u8; 32],
    pub payload_len: u32,
    pub timestamp: i64,
}

/// Emitted when the manager is paused.
#[event]
pub struct ManagerPausedEvent {
    pub manager: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}

/// Emitted when the manager is unpaused.
#[event]
pub struct ManagerUnpausedEvent {
    pub manager: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}
