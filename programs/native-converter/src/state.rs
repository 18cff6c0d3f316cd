//! On-chain state and migration-cap logic for the native converter.
//!
//! The converter issues the local claim-token representation 1:1 against
//! backing held here, then gradually migrates that backing to the main
//! ledger's vault. A configurable floor stays local so holders can always
//! deconvert some amount without waiting for a round trip.

use anchor_lang::prelude::*;

use crate::constants::PERCENTAGE_DENOMINATOR;
use crate::errors::ConverterError;

/// Per-asset converter state.
/// Seeds: ["converter_state", underlying_mint]
#[account]
pub struct ConverterState {
    /// PDA bump
    pub bump: u8,
    /// Version for future migrations
    pub version: u8,
    /// Admin authority
    pub admin: Pubkey,
    /// Local backing asset mint (Token-2022, may carry a transfer fee)
    pub underlying_mint: Pubkey,
    /// Underlying mint decimals
    pub underlying_decimals: u8,
    /// Local claim-token representation mint (standard SPL, authority = converter PDA)
    pub local_mint: Pubkey,
    /// Backing token account
    pub backing_account: Pubkey,
    /// Cross-ledger transport program
    pub transport_program: Pubkey,
    /// This ledger's id on the transport
    pub ledger_id: u32,
    /// Main ledger hosting the destination vault
    pub destination_ledger_id: u32,
    /// Migration recipient on the main ledger (manager or vault address)
    pub destination_address: [u8; 32],
    /// Fraction of the current backing balance that must stay local (whole percents)
    pub non_migratable_percentage: u8,
    /// Local claim tokens currently outstanding
    pub total_issued: u64,
    /// Cumulative backing migrated to the main ledger
    pub total_migrated: u64,
    /// Operator kill-switch
    pub paused: bool,
    /// Reserved for future use
    pub _reserved: [u8; 32],
}

impl ConverterState {
    pub const LEN: usize = 8 // discriminator
        + 1   // bump
        + 1   // version
        + 32  // admin
        + 32  // underlying_mint
        + 1   // underlying_decimals
        + 32  // local_mint
        + 32  // backing_account
        + 32  // transport_program
        + 4   // ledger_id
        + 4   // destination_ledger_id
        + 32  // destination_address
        + 1   // non_migratable_percentage
        + 8   // total_issued
        + 8   // total_migrated
        + 1   // paused
        + 32; // _reserved

    /// Backing that must stay local: the configured fraction of the current
    /// backing balance, rounded up so the floor is never undershot.
    pub fn minimum_local_backing(&self, backing_balance: u64) -> Result<u64> {
        let numerator = (backing_balance as u128)
            .checked_mul(self.non_migratable_percentage as u128)
            .ok_or(ConverterError::MathOverflow)?;
        let floor = numerator
            .checked_add(PERCENTAGE_DENOMINATOR as u128 - 1)
            .ok_or(ConverterError::MathOverflow)?
            / (PERCENTAGE_DENOMINATOR as u128);
        u64::try_from(floor).map_err(|_| error!(ConverterError::MathOverflow))
    }

    /// How much of the current backing balance may migrate right now.
    pub fn migratable_backing(&self, backing_balance: u64) -> Result<u64> {
        Ok(backing_balance.saturating_sub(self.minimum_local_backing(backing_balance)?))
    }

    pub fn record_convert(&mut self, minted: u64) -> Result<()> {
        self.total_issued = self
            .total_issued
            .checked_add(minted)
            .ok_or(ConverterError::MathOverflow)?;
        Ok(())
    }

    pub fn record_deconvert(&mut self, burned: u64) -> Result<()> {
        self.total_issued = self
            .total_issued
            .checked_sub(burned)
            .ok_or(ConverterError::MathOverflow)?;
        Ok(())
    }

    pub fn record_migration(&mut self, amount: u64) -> Result<()> {
        self.total_migrated = self
            .total_migrated
            .checked_add(amount)
            .ok_or(ConverterError::MathOverflow)?;
        Ok(())
    }
}
