//! On-chain state for the migration manager.

use anchor_lang::prelude::*;

/// How a routed migration's asset leg reaches the vault.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FundingSource {
    /// The transport delivered SPL tokens into the pair escrow.
    TokenPull,
    /// The transport delivered native lamports into the pair's wrapped-native
    /// escrow; the balance is synced into token form before routing.
    WrappedNative,
}

/// Singleton manager state.
/// Seeds: ["manager"]
#[account]
pub struct ManagerState {
    /// PDA bump
    pub bump: u8,
    /// Admin authority
    pub admin: Pubkey,
    /// Cross-ledger transport program
    pub transport_program: Pubkey,
    /// Transport endpoint authority PDA (signs inbound deliveries)
    pub transport_authority: Pubkey,
    /// This ledger's id on the transport
    pub ledger_id: u32,
    /// Operator kill-switch
    pub paused: bool,
    /// Reserved for future use
    pub _reserved: [u8; 16],
}

impl ManagerState {
    pub const LEN: usize = 8 // discriminator
        + 1   // bump
        + 32  // admin
        + 32  // transport_program
        + 32  // transport_authority
        + 4   // ledger_id
        + 1   // paused
        + 16; // _reserved
}

/// Routing entry binding one origin-ledger converter to one local vault.
/// Seeds: ["token_pair", manager, origin_ledger_id, converter]
///
/// This is the manager-path trust boundary: a migration message is routed
/// only if an enabled pair exists for its (origin ledger, sender) tuple.
#[account]
pub struct TokenPair {
    /// PDA bump
    pub bump: u8,
    /// Escrow PDA bump
    pub escrow_bump: u8,
    /// Parent manager
    pub manager: Pubkey,
    /// Origin ledger this pair covers
    pub origin_ledger_id: u32,
    /// Converter address on the origin ledger
    pub converter: [u8; 32],
    /// Local vault the migration settles into
    pub vault: Pubkey,
    /// Underlying mint of that vault
    pub underlying_mint: Pubkey,
    /// Manager-owned escrow receiving the asset leg
    pub escrow: Pubkey,
    /// How the asset leg arrives
    pub funding_source: FundingSource,
    /// Disabled pairs stay allocated but reject everything
    pub enabled: bool,
}

impl TokenPair {
    pub const LEN: usize = 8 // discriminator
        + 1   // bump
        + 1   // escrow_bump
        + 32  // manager
        + 4   // origin_ledger_id
        + 32  // converter
        + 32  // vault
        + 32  // underlying_mint
        + 32  // escrow
        + 1   // funding_source
        + 1;  // enabled

    pub fn authorizes(&self, origin_address: &[u8; 32]) -> bool {
        self.enabled && &self.converter == origin_address
    }
}
