#![allow(clippy::too_many_arguments)]

//! # VaultToken
//!
//! Yield-bearing custody vault for a bridged asset. Holds the underlying
//! (Token-2022, possibly fee-on-transfer) split between a liquid reserve and
//! an external yield facility, and mints 1:1 claim tokens (standard SPL)
//! against it. Claim tokens travel across ledgers through a transport
//! program; backing migrated in from secondary ledgers is reconciled here
//! with an earmarked fees fund absorbing transfer-fee discrepancies.

use anchor_lang::prelude::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod message;
pub mod state;
pub mod transport;
pub mod yield_vault;

pub use constants::*;
pub use errors::*;
pub use events::*;
pub use instructions::*;
pub use message::*;
pub use state::*;

declare_id!("4Zr8NocHSec9KZr63xfZKkj6DamccMFqD1Yk6i8tzDg9");

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "Vault Token",
    project_url: "https://github.com/twzrd-sol/vault-token-program",
    contacts: "email:security@twzrd.xyz",
    policy: "https://github.com/twzrd-sol/vault-token-program/blob/main/SECURITY.md",
    preferred_languages: "en",
    source_code: "https://github.com/twzrd-sol/vault-token-program"
}

#[program]
pub mod vault_token {
    use super::*;

    // -------------------------------------------------------------------------
    // Vault Lifecycle
    // -------------------------------------------------------------------------

    /// Initialize a new vault for an underlying mint.
    pub fn initialize_vault(
        ctx: Context<InitializeVault>,
        params: InitializeParams,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    // -------------------------------------------------------------------------
    // User Actions
    // -------------------------------------------------------------------------

    /// Deposit underlying assets, mint claim tokens to the receiver.
    pub fn deposit(ctx: Context<Deposit>, assets: u64) -> Result<()> {
        instructions::deposit::deposit(ctx, assets)
    }

    /// Mint an exact number of claim tokens, pulling whatever pre-fee amount
    /// is needed to back them.
    pub fn mint_shares(ctx: Context<Deposit>, shares: u64) -> Result<()> {
        instructions::deposit::mint_shares(ctx, shares)
    }

    /// Deposit and forward the minted claim tokens to another ledger in one
    /// transaction.
    pub fn deposit_and_bridge(
        ctx: Context<DepositAndBridge>,
        assets: u64,
        destination_ledger_id: u32,
        destination_address: [u8; 32],
    ) -> Result<()> {
        instructions::deposit::deposit_and_bridge(
            ctx,
            assets,
            destination_ledger_id,
            destination_address,
        )
    }

    /// Withdraw underlying assets, burning the matching claim tokens.
    pub fn withdraw(ctx: Context<Withdraw>, assets: u64) -> Result<()> {
        instructions::withdraw::withdraw(ctx, assets)
    }

    /// Burn an exact number of claim tokens for their asset value.
    pub fn redeem(ctx: Context<Withdraw>, shares: u64) -> Result<()> {
        instructions::withdraw::redeem(ctx, shares)
    }

    /// Claim an inbound bridged claim-token leg and redeem it immediately.
    pub fn claim_and_redeem(ctx: Context<ClaimAndRedeem>, claim_data: Vec<u8>) -> Result<()> {
        instructions::withdraw::claim_and_redeem(ctx, claim_data)
    }

    // -------------------------------------------------------------------------
    // Donations
    // -------------------------------------------------------------------------

    /// Donate assets into the backing; surfaces as collectible yield.
    pub fn donate_as_yield(ctx: Context<Donate>, amount: u64) -> Result<()> {
        instructions::donate::donate_as_yield(ctx, amount)
    }

    /// Donate assets into the migration fees fund.
    pub fn donate_for_completing_migration(ctx: Context<Donate>, amount: u64) -> Result<()> {
        instructions::donate::donate_for_completing_migration(ctx, amount)
    }

    // -------------------------------------------------------------------------
    // Permissionless Operations
    // -------------------------------------------------------------------------

    /// Mint accrued surplus backing to the yield recipient. Anyone can call
    /// this (keeper incentive); `force` errors when nothing has accrued.
    pub fn collect_yield(ctx: Context<CollectYield>, force: bool) -> Result<()> {
        instructions::yield_ops::collect_yield(ctx, force)
    }

    // -------------------------------------------------------------------------
    // Yield Recipient
    // -------------------------------------------------------------------------

    /// Return over-collected yield by burning claim tokens without payout.
    pub fn burn_collected_yield(ctx: Context<BurnCollectedYield>, shares: u64) -> Result<()> {
        instructions::yield_ops::burn_collected_yield(ctx, shares)
    }

    // -------------------------------------------------------------------------
    // Migration
    // -------------------------------------------------------------------------

    /// Complete a backing migration delivered through the migration manager.
    pub fn complete_migration(
        ctx: Context<CompleteMigration>,
        origin_ledger_id: u32,
        shares: u64,
        assets: u64,
    ) -> Result<()> {
        instructions::migration::complete_migration(ctx, origin_ledger_id, shares, assets)
    }

    /// Handle a cross-ledger message delivered by the transport.
    pub fn on_message_received(
        ctx: Context<OnMessageReceived>,
        origin_ledger_id: u32,
        origin_address: [u8; 32],
        payload: Vec<u8>,
    ) -> Result<()> {
        instructions::migration::on_message_received(ctx, origin_ledger_id, origin_address, payload)
    }

    // -------------------------------------------------------------------------
    // Admin
    // -------------------------------------------------------------------------

    /// Rebalance the reserve against its target percentage. Available while
    /// paused so liquidity can be restored before unpausing.
    pub fn rebalance_reserve(
        ctx: Context<Rebalance>,
        allow_down: bool,
        force: bool,
    ) -> Result<()> {
        instructions::rebalance::handler(ctx, allow_down, force)
    }

    pub fn pause(ctx: Context<AdminOnly>) -> Result<()> {
        instructions::admin::pause(ctx)
    }

    pub fn unpause(ctx: Context<AdminOnly>) -> Result<()> {
        instructions::admin::unpause(ctx)
    }

    pub fn set_yield_recipient(ctx: Context<AdminOnly>, new_recipient: Pubkey) -> Result<()> {
        instructions::admin::set_yield_recipient(ctx, new_recipient)
    }

    pub fn set_minimum_reserve_percentage(
        ctx: Context<AdminOnly>,
        new_percentage: u8,
    ) -> Result<()> {
        instructions::admin::set_minimum_reserve_percentage(ctx, new_percentage)
    }

    /// Bind (or clear) the converter trusted on an origin ledger.
    pub fn set_native_converter(
        ctx: Context<SetNativeConverter>,
        origin_ledger_id: u32,
        converter: [u8; 32],
    ) -> Result<()> {
        instructions::admin::set_native_converter(ctx, origin_ledger_id, converter)
    }

    /// Rotate the yield facility, draining the old position into reserve.
    /// Requires the vault paused.
    pub fn set_yield_vault(ctx: Context<SetYieldVault>) -> Result<()> {
        instructions::admin::set_yield_vault(ctx)
    }
}
