//! Event definitions for the vault token program.

use anchor_lang::prelude::*;

/// Emitted when a new vault is initialized.
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub underlying_mint: Pubkey,
    pub claim_mint: Pubkey,
    pub ledger_id: u32,
    pub minimum_reserve_percentage: u8,
    pub admin: Pubkey,
    pub timestamp: i64,
}

/// Emitted when a user deposits underlying assets for claim tokens.
#[event]
pub struct Deposited {
    pub depositor: Pubkey,
    pub receiver: Pubkey,
    pub vault: Pubkey,
    /// Post-fee amount actually received
    pub assets_received: u64,
    pub shares_minted: u64,
    pub kept_in_reserve: u64,
    pub pushed_to_yield_vault: u64,
    pub timestamp: i64,
}

/// Emitted when claim tokens are locked here and forwarded through the
/// transport to a destination ledger.
#[event]
pub struct ClaimTokensBridged {
    pub vault: Pubkey,
    pub destination_ledger_id: u32,
    pub destination_address: [u8; 32],
    pub shares: u64,
    pub timestamp: i64,
}

/// Emitted when assets are withdrawn and the matching shares burned.
#[event]
pub struct Withdrawn {
    pub owner: Pubkey,
    pub receiver: Pubkey,
    pub vault: Pubkey,
    pub assets: u64,
    pub served_from_reserve: u64,
    pub pulled_from_yield_vault: u64,
    pub shares_burned: u64,
    pub timestamp: i64,
}

/// Emitted when the reserve is rebalanced against its target.
#[event]
pub struct ReserveRebalanced {
    pub vault: Pubkey,
    /// Assets pulled from the yield vault into reserve
    pub replenished: u64,
    /// Assets pushed from reserve into the yield vault
    pub offloaded: u64,
    pub reserved_assets: u64,
    pub timestamp: i64,
}

/// Emitted when surplus backing is minted to the yield recipient.
#[event]
pub struct YieldCollected {
    pub vault: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub net_collected_yield: i128,
    pub timestamp: i64,
}

/// Emitted when the yield recipient returns over-collected yield.
#[event]
pub struct CollectedYieldReturned {
    pub vault: Pubkey,
    pub recipient: Pubkey,
    pub shares_burned: u64,
    pub net_collected_yield: i128,
    pub timestamp: i64,
}

/// Emitted when assets are donated straight into the reserve.
#[event]
pub struct YieldDonated {
    pub vault: Pubkey,
    pub donor: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

/// Emitted when assets are donated into the migration fees fund.
#[event]
pub struct MigrationFeesDonated {
    pub vault: Pubkey,
    pub donor: Pubkey,
    pub amount: u64,
    pub fund_balance: u64,
    pub timestamp: i64,
}

/// Completion record for a backing migration from a secondary ledger.
#[event]
pub struct MigrationCompleted {
    pub vault: Pubkey,
    pub origin_ledger_id: u32,
    pub shares: u64,
    pub assets_before_fee: u64,
    pub assets_after_fee: u64,
    /// Shortfall covered from the migration fees fund
    pub discrepancy: u64,
    pub fees_fund_balance: u64,
    pub timestamp: i64,
}

/// Emitted when freshly minted claim tokens are forwarded to the
/// non-claimable zero address on the origin ledger.
#[event]
pub struct PhantomLiquidityForwarded {
    pub vault: Pubkey,
    pub origin_ledger_id: u32,
    pub shares: u64,
    pub timestamp: i64,
}

/// Emitted when a custom cross-ledger message is received and left to
/// off-chain consumers.
#[event]
pub struct CustomMessageReceived {
    pub vault: Pubkey,
    pub origin_ledger_id: u32,
    pub origin_address: [u8; 32],
    pub payload_len: u32,
    pub timestamp: i64,
}

/// Emitted when a converter binding for an origin ledger is set or cleared.
#[event]
pub struct ConverterConfigured {
    pub vault: Pubkey,
    pub origin_ledger_id: u32,
    pub converter: [u8; 32],
    pub enabled: bool,
    pub timestamp: i64,
}

/// Emitted when the yield recipient is updated.
#[event]
pub struct YieldRecipientUpdated {
    pub vault: Pubkey,
    pub old_recipient: Pubkey,
    pub new_recipient: Pubkey,
    pub timestamp: i64,
}

/// Emitted when the minimum reserve percentage is updated.
#[event]
pub struct MinimumReservePercentageUpdated {
    pub vault: Pubkey,
    pub old_percentage: u8,
    pub new_percentage: u8,
    pub timestamp: i64,
}

/// Emitted when the yield facility is rotated.
#[event]
pub struct YieldVaultUpdated {
    pub vault: Pubkey,
    pub old_yield_vault: Pubkey,
    pub new_yield_vault: Pubkey,
    /// Assets drained from the old facility into reserve
    pub drained_assets: u64,
    pub timestamp: i64,
}

/// Emitted when the vault is paused.
#[event]
pub struct Paused {
    pub vault: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}

/// Emitted when the vault is unpaused.
#[event]
pub struct Unpaused {
    pub vault: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}
