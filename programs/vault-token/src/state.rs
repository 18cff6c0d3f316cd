//! On-chain state and the reserve/yield accounting engine.
//!
//! All accounting decisions are pure methods on [`VaultState`] so the engine
//! can be exercised directly in tests. Instruction handlers measure token
//! balance deltas, ask the engine for a plan, move tokens, then commit the
//! plan through a `record_*` method.

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, PERCENTAGE_DENOMINATOR};
use crate::errors::VaultError;

// =============================================================================
// VAULT STATE
// =============================================================================

/// Per-instance vault state.
/// Seeds: ["vault", underlying_mint]
#[account]
pub struct VaultState {
    /// PDA bump
    pub bump: u8,
    /// Version for future migrations
    pub version: u8,
    /// Admin authority
    pub admin: Pubkey,
    /// Underlying asset mint (Token-2022, may carry a transfer fee)
    pub underlying_mint: Pubkey,
    /// Underlying mint decimals
    pub underlying_decimals: u8,
    /// Claim token mint (standard SPL, authority = vault PDA)
    pub claim_mint: Pubkey,
    /// Liquid reserve token account (underlying)
    pub reserve_account: Pubkey,
    /// Vault-owned claim token escrow for bridged/phantom mints
    pub claim_escrow: Pubkey,
    /// Inbox token account for asset legs delivered directly to this vault
    pub migration_inbox: Pubkey,
    /// External yield facility program
    pub yield_vault_program: Pubkey,
    /// External yield facility state account
    pub yield_vault: Pubkey,
    /// Vault's facility share token account
    pub yield_share_account: Pubkey,
    /// Recipient of collected yield
    pub yield_recipient: Pubkey,
    /// Cross-ledger transport program
    pub transport_program: Pubkey,
    /// Transport endpoint authority PDA (signs inbound deliveries)
    pub transport_authority: Pubkey,
    /// Migration manager authority allowed to call complete_migration
    pub migration_manager: Pubkey,
    /// This ledger's id on the transport
    pub ledger_id: u32,
    /// Fraction of backing kept immediately liquid (whole percents, 0-100)
    pub minimum_reserve_percentage: u8,
    /// Received amounts below this stay entirely in reserve
    pub minimum_yield_vault_deposit: u64,
    /// Acceptable facility slippage for drain/withdraw safety checks (bps)
    pub max_slippage_bps: u16,
    /// Per-asset transfer fee estimator (bps, 0 = identity)
    pub transfer_fee_bps: u16,
    /// Liquid, instantly withdrawable backing
    pub reserved_assets: u64,
    /// Buffer covering transfer-fee discrepancy during migration completion
    pub migration_fees_fund: u64,
    /// Yield minted to the recipient minus voluntarily returned; may go negative
    pub net_collected_yield: i128,
    /// Claim token supply mirror
    pub total_shares: u64,
    /// Operator kill-switch
    pub paused: bool,
    /// Mutual-exclusion guard against collaborator re-entry
    pub entered: bool,
    /// Reserved for future use
    pub _reserved: [u8; 32],
}

/// Reserve/facility destination split for incoming assets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReserveSplit {
    pub to_reserve: u64,
    pub to_yield_vault: u64,
}

/// Outcome of comparing the reserve to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebalanceAction {
    /// Nothing to move
    Balanced,
    /// Reserve below target but the facility has nothing withdrawable
    Starved,
    /// Pull this amount from the facility into reserve
    Replenish(u64),
    /// Push this amount from reserve into the facility
    Offload(u64),
}

/// Validated plan for reconciling a migration completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MigrationPlan {
    pub shares: u64,
    /// Backing the minted shares must be covered by
    pub required_assets: u64,
    /// Post-fee assets actually in custody
    pub assets_received: u64,
    /// Shortfall covered from the migration fees fund
    pub covered_discrepancy: u64,
    /// Over-delivery accrued to the migration fees fund
    pub surplus_to_fund: u64,
    /// Split of the backing portion, deposit-style
    pub split: ReserveSplit,
}

impl VaultState {
    pub const LEN: usize = 8 // discriminator
        + 1   // bump
        + 1   // version
        + 32  // admin
        + 32  // underlying_mint
        + 1   // underlying_decimals
        + 32  // claim_mint
        + 32  // reserve_account
        + 32  // claim_escrow
        + 32  // migration_inbox
        + 32  // yield_vault_program
        + 32  // yield_vault
        + 32  // yield_share_account
        + 32  // yield_recipient
        + 32  // transport_program
        + 32  // transport_authority
        + 32  // migration_manager
        + 4   // ledger_id
        + 1   // minimum_reserve_percentage
        + 8   // minimum_yield_vault_deposit
        + 2   // max_slippage_bps
        + 2   // transfer_fee_bps
        + 8   // reserved_assets
        + 8   // migration_fees_fund
        + 16  // net_collected_yield
        + 8   // total_shares
        + 1   // paused
        + 1   // entered
        + 32; // _reserved

    // -------------------------------------------------------------------------
    // Conversions
    // -------------------------------------------------------------------------

    /// Claim tokens are a 1:1 claim on the underlying asset. Changing either
    /// conversion changes the economics of the whole system.
    pub fn convert_to_assets(&self, shares: u64) -> u64 {
        shares
    }

    pub fn convert_to_shares(&self, assets: u64) -> u64 {
        assets
    }

    // -------------------------------------------------------------------------
    // Reserve / yield engine
    // -------------------------------------------------------------------------

    /// Reserve target for a given claim token supply.
    pub fn minimum_reserve(&self, total_shares: u64) -> Result<u64> {
        let target = (self.convert_to_assets(total_shares) as u128)
            .checked_mul(self.minimum_reserve_percentage as u128)
            .ok_or(VaultError::MathOverflow)?
            .checked_div(PERCENTAGE_DENOMINATOR as u128)
            .ok_or(VaultError::MathOverflow)?;
        u64::try_from(target).map_err(|_| error!(VaultError::MathOverflow))
    }

    /// Total backing: liquid reserve plus the facility position in asset terms.
    /// The migration fees fund is earmarked and never counts as backing.
    pub fn total_assets(&self, staked_assets: u64) -> Result<u64> {
        self.reserved_assets
            .checked_add(staked_assets)
            .ok_or_else(|| error!(VaultError::MathOverflow))
    }

    /// Non-negative surplus of backing over what the supply can redeem.
    pub fn collectible_yield(&self, staked_assets: u64) -> Result<u64> {
        let backing = self.total_assets(staked_assets)?;
        Ok(backing.saturating_sub(self.convert_to_assets(self.total_shares)))
    }

    /// Backing invariant: staked + reserved >= convert_to_assets(total_shares).
    pub fn is_fully_backed(&self, staked_assets: u64) -> bool {
        match self.total_assets(staked_assets) {
            Ok(backing) => backing >= self.convert_to_assets(self.total_shares),
            Err(_) => false,
        }
    }

    /// Decide where measured incoming assets go, given the shares about to be
    /// minted against them. Dust stays liquid; otherwise the reserve is
    /// topped up to its post-mint target and the remainder is destined for
    /// the facility. Callers cap the facility leg by the facility's capacity
    /// and fold any undepositable remainder back into reserve — funds are
    /// never lost.
    pub fn reserve_split(&self, received: u64, new_shares: u64) -> Result<ReserveSplit> {
        if received < self.minimum_yield_vault_deposit {
            return Ok(ReserveSplit {
                to_reserve: received,
                to_yield_vault: 0,
            });
        }

        let supply_after = self
            .total_shares
            .checked_add(new_shares)
            .ok_or(VaultError::MathOverflow)?;
        let target = self.minimum_reserve(supply_after)?;
        let shortfall = target.saturating_sub(self.reserved_assets);

        let to_reserve = received.min(shortfall);
        Ok(ReserveSplit {
            to_reserve,
            to_yield_vault: received - to_reserve,
        })
    }

    /// Compare the reserve to its target and produce the move that closes
    /// the gap, bounded by the facility's capacity at call time.
    pub fn rebalance_plan(
        &self,
        facility_max_deposit: u64,
        facility_max_withdraw: u64,
        allow_down: bool,
    ) -> Result<RebalanceAction> {
        let target = self.minimum_reserve(self.total_shares)?;

        if self.reserved_assets < target {
            let shortfall = target - self.reserved_assets;
            let amount = shortfall.min(facility_max_withdraw);
            if amount == 0 {
                return Ok(RebalanceAction::Starved);
            }
            return Ok(RebalanceAction::Replenish(amount));
        }

        if self.reserved_assets > target && allow_down {
            let excess = self.reserved_assets - target;
            let amount = excess.min(facility_max_deposit);
            if amount == 0 {
                return Ok(RebalanceAction::Balanced);
            }
            return Ok(RebalanceAction::Offload(amount));
        }

        Ok(RebalanceAction::Balanced)
    }

    // -------------------------------------------------------------------------
    // Migration reconciliation
    // -------------------------------------------------------------------------

    /// Validate a migration completion and plan its effects.
    ///
    /// A shortfall between required backing and measured custody must be
    /// fully covered by the migration fees fund — no partial mint is ever
    /// issued. Over-delivery accrues to the fund. The backing portion is
    /// split reserve/facility exactly like a deposit, with `shares` as the
    /// new-shares term.
    pub fn plan_migration(&self, shares: u64, assets_received: u64) -> Result<MigrationPlan> {
        require!(shares > 0, VaultError::ZeroShares);

        let required_assets = self.convert_to_assets(shares);

        let (covered_discrepancy, surplus_to_fund, backing) = if assets_received < required_assets
        {
            let discrepancy = required_assets - assets_received;
            if discrepancy > self.migration_fees_fund {
                return Err(error!(VaultError::CannotCompleteMigration));
            }
            (discrepancy, 0, assets_received)
        } else {
            (0, assets_received - required_assets, required_assets)
        };

        let split = self.reserve_split(backing, shares)?;

        Ok(MigrationPlan {
            shares,
            required_assets,
            assets_received,
            covered_discrepancy,
            surplus_to_fund,
            split,
        })
    }

    // -------------------------------------------------------------------------
    // Transfer fee estimators
    // -------------------------------------------------------------------------

    /// Estimate what arrives after the underlying's transfer fee.
    /// Identity when the asset is fee-free. Previews only — custody paths
    /// always measure the actual balance delta.
    pub fn assets_after_transfer_fee(&self, before: u64) -> Result<u64> {
        if self.transfer_fee_bps == 0 {
            return Ok(before);
        }
        let fee = (before as u128)
            .checked_mul(self.transfer_fee_bps as u128)
            .ok_or(VaultError::MathOverflow)?
            / (BPS_DENOMINATOR as u128);
        Ok(before - fee as u64)
    }

    /// Smallest pre-fee amount whose post-fee delivery is at least `min_after`.
    pub fn assets_before_transfer_fee(&self, min_after: u64) -> Result<u64> {
        if self.transfer_fee_bps == 0 {
            return Ok(min_after);
        }
        let keep = (BPS_DENOMINATOR as u128) - (self.transfer_fee_bps as u128);
        let numerator = (min_after as u128)
            .checked_mul(BPS_DENOMINATOR as u128)
            .ok_or(VaultError::MathOverflow)?;
        let before = numerator
            .checked_add(keep - 1)
            .ok_or(VaultError::MathOverflow)?
            / keep;
        u64::try_from(before).map_err(|_| error!(VaultError::MathOverflow))
    }

    // -------------------------------------------------------------------------
    // Ledger commits
    // -------------------------------------------------------------------------

    /// Commit a deposit: `received` measured assets are in the reserve
    /// account, of which `pushed_to_yield_vault` moved on to the facility.
    pub fn record_deposit(
        &mut self,
        received: u64,
        shares: u64,
        pushed_to_yield_vault: u64,
    ) -> Result<()> {
        let kept = received
            .checked_sub(pushed_to_yield_vault)
            .ok_or(VaultError::MathOverflow)?;
        self.reserved_assets = self
            .reserved_assets
            .checked_add(kept)
            .ok_or(VaultError::MathOverflow)?;
        self.total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    /// Commit a withdrawal: `pulled_from_yield_vault` measured assets landed
    /// in reserve first, then `assets` left it; the matching shares burn.
    pub fn record_withdrawal(
        &mut self,
        assets: u64,
        pulled_from_yield_vault: u64,
        shares: u64,
    ) -> Result<()> {
        self.reserved_assets = self
            .reserved_assets
            .checked_add(pulled_from_yield_vault)
            .ok_or(VaultError::MathOverflow)?
            .checked_sub(assets)
            .ok_or(VaultError::MathOverflow)?;
        self.total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    /// Commit a validated migration plan.
    pub fn record_migration(
        &mut self,
        plan: &MigrationPlan,
        pushed_to_yield_vault: u64,
    ) -> Result<()> {
        let backing = plan
            .split
            .to_reserve
            .checked_add(plan.split.to_yield_vault)
            .ok_or(VaultError::MathOverflow)?;
        let kept = backing
            .checked_sub(pushed_to_yield_vault)
            .ok_or(VaultError::MathOverflow)?;

        self.migration_fees_fund = self
            .migration_fees_fund
            .checked_sub(plan.covered_discrepancy)
            .ok_or(VaultError::MathOverflow)?
            .checked_add(plan.surplus_to_fund)
            .ok_or(VaultError::MathOverflow)?;
        self.reserved_assets = self
            .reserved_assets
            .checked_add(plan.covered_discrepancy)
            .ok_or(VaultError::MathOverflow)?
            .checked_add(kept)
            .ok_or(VaultError::MathOverflow)?;
        self.total_shares = self
            .total_shares
            .checked_add(plan.shares)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    /// Commit a yield collection: surplus minted to the recipient.
    pub fn record_collected_yield(&mut self, amount: u64) -> Result<()> {
        self.net_collected_yield = self
            .net_collected_yield
            .checked_add(amount as i128)
            .ok_or(VaultError::MathOverflow)?;
        self.total_shares = self
            .total_shares
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    /// Commit a yield return: the recipient burned over-collected shares.
    /// `net_collected_yield` may go negative.
    pub fn record_returned_yield(&mut self, shares: u64) -> Result<()> {
        self.net_collected_yield = self
            .net_collected_yield
            .checked_sub(shares as i128)
            .ok_or(VaultError::MathOverflow)?;
        self.total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub fn record_yield_donation(&mut self, amount: u64) -> Result<()> {
        self.reserved_assets = self
            .reserved_assets
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub fn record_migration_fees_donation(&mut self, amount: u64) -> Result<()> {
        self.migration_fees_fund = self
            .migration_fees_fund
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Mutual exclusion
    // -------------------------------------------------------------------------

    /// Enter the mutating critical section. Collaborator CPIs can re-enter
    /// this program mid-operation; the flag is persisted before any external
    /// call so a nested top-level mutation is rejected.
    pub fn begin_mutating(&mut self) -> Result<()> {
        require!(!self.entered, VaultError::ReentrantCall);
        self.entered = true;
        Ok(())
    }

    pub fn end_mutating(&mut self) {
        self.entered = false;
    }
}

// =============================================================================
// CONVERTER BINDING
// =============================================================================

/// Authorized native converter for an origin ledger.
/// Seeds: ["converter", vault, origin_ledger_id]
///
/// This binding is the sole trust boundary guarding mint authority on the
/// direct message path: an inbound `on_message_received` is honored only if
/// the sender matches the bound converter address.
#[account]
pub struct ConverterBinding {
    /// PDA bump
    pub bump: u8,
    /// Parent vault
    pub vault: Pubkey,
    /// Origin ledger this binding covers
    pub origin_ledger_id: u32,
    /// Converter address on the origin ledger
    pub converter: [u8; 32],
    /// Cleared bindings stay allocated but reject everything
    pub enabled: bool,
}

impl ConverterBinding {
    pub const LEN: usize = 8 // discriminator
        + 1   // bump
        + 32  // vault
        + 4   // origin_ledger_id
        + 32  // converter
        + 1;  // enabled

    pub fn authorizes(&self, origin_address: &[u8; 32]) -> bool {
        self.enabled && &self.converter == origin_address
    }
}
