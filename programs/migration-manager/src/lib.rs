#![allow(clippy::too_many_arguments)]

//! # MigrationManager
//!
//! Routes backing migrations arriving from native converters on secondary
//! ledgers into their local vault. Each (origin ledger, converter) tuple
//! maps to one vault through a configured token pair; the manager
//! authenticates the sender, readies the asset leg, and settles through the
//! vault program via CPI.

use anchor_lang::prelude::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;

pub use constants::*;
pub use errors::*;
pub use events::*;
pub use instructions::*;
pub use state::*;

declare_id!("6Z4j75BCwmMZG1Szagyt7Cd3fc48Tf4KNjTXUxrLKN1k");

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "Migration Manager",
    project_url: "https://github.com/twzrd-sol/vault-token-program",
    contacts: "email:security@twzrd.xyz",
    policy: "https://github.com/twzrd-sol/vault-token-program/blob/main/SECURITY.md",
    preferred_languages: "en",
    source_code: "https://github.com/twzrd-sol/vault-token-program"
}

#[program]
pub mod migration_manager {
    use super::*;

    /// Initialize the singleton manager.
    pub fn initialize_manager(
        ctx: Context<InitializeManager>,
        transport_program: Pubkey,
        transport_authority: Pubkey,
        ledger_id: u32,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, transport_program, transport_authority, ledger_id)
    }

    /// Bind one origin-ledger converter to one local vault. One pair per
    /// call; re-running updates in place.
    pub fn configure_native_converter(
        ctx: Context<ConfigureNativeConverter>,
        origin_ledger_id: u32,
        converter: [u8; 32],
        funding_source: FundingSource,
        enabled: bool,
    ) -> Result<()> {
        instructions::configure::handler(ctx, origin_ledger_id, converter, funding_source, enabled)
    }

    /// Handle a cross-ledger message delivered by the transport.
    pub fn on_message_received(
        ctx: Context<OnMessageReceived>,
        origin_ledger_id: u32,
        origin_address: [u8; 32],
        payload: Vec<u8>,
    ) -> Result<()> {
        instructions::route::handler(ctx, origin_ledger_id, origin_address, payload)
    }

    pub fn pause(ctx: Context<ManagerAdminOnly>) -> Result<()> {
        instructions::admin::pause(ctx)
    }

    pub fn unpause(ctx: Context<ManagerAdminOnly>) -> Result<()> {
        instructions::admin::unpause(ctx)
    }
}
