#![allow(clippy::too_many_arguments)]

//! # NativeConverter
//!
//! Secondary-ledger issuer for a bridged claim token. Locks local backing
//! and mints the local representation 1:1; backing above a configurable
//! local floor migrates to the main-ledger vault, paired atomically with the
//! message that reconciles supply over there.

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

declare_id!("Dyfu89gTcDasRjux3SMGwz5BydD5rDKbZ4yVhNG7EfuW");

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "Native Converter",
    project_url: "https://github.com/twzrd-sol/vault-token-program",
    contacts: "email:security@twzrd.xyz",
    policy: "https://github.com/twzrd-sol/vault-token-program/blob/main/SECURITY.md",
    preferred_languages: "en",
    source_code: "https://github.com/twzrd-sol/vault-token-program"
}

#[program]
pub mod native_converter {
    use super::*;

    /// Initialize a converter for a local backing asset.
    pub fn initialize_converter(
        ctx: Context<InitializeConverter>,
        params: InitializeConverterParams,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Lock backing, mint the measured post-fee amount of local tokens.
    pub fn convert(ctx: Context<Convert>, amount: u64) -> Result<()> {
        instructions::convert::convert(ctx, amount)
    }

    /// Burn local tokens for the same amount of backing, while it lasts.
    pub fn deconvert(ctx: Context<Deconvert>, amount: u64) -> Result<()> {
        instructions::convert::deconvert(ctx, amount)
    }

    /// Send migratable backing to the main-ledger vault. Anyone can call
    /// this (keeper incentive); the local floor caps what leaves.
    pub fn migrate_backing_to_layer_x(ctx: Context<MigrateBacking>, amount: u64) -> Result<()> {
        instructions::migrate::handler(ctx, amount)
    }

    pub fn pause(ctx: Context<ConverterAdminOnly>) -> Result<()> {
        instructions::admin::pause(ctx)
    }

    pub fn unpause(ctx: Context<ConverterAdminOnly>) -> Result<()> {
        instructions::admin::unpause(ctx)
    }

    pub fn set_non_migratable_percentage(
        ctx: Context<ConverterAdminOnly>,
        new_percentage: u8,
    ) -> Result<()> {
        instructions::admin::set_non_migratable_percentage(ctx, new_percentage)
    }
}
