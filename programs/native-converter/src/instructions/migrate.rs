//! Migrate local backing to the main-ledger vault.
//!
//! The asset leg and the `CompleteMigration` message leave in the same
//! instruction, so the main ledger can never see one without the other
//! having been sent. Delivery order over there is the transport's business;
//! the vault holds the asset leg in its inbox until the message arrives.

use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};

use vault_token::message::CrossLedgerInstruction;
use vault_token::transport::{TransportAssetCpi, TransportMessageCpi};

use crate::constants::CONVERTER_STATE_SEED;
use crate::errors::ConverterError;
use crate::events::BackingMigrated;
use crate::state::ConverterState;

#[derive(Accounts)]
pub struct MigrateBacking<'info> {
    /// Anyone may trigger a migration; the caps make it harmless.
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [CONVERTER_STATE_SEED, converter.underlying_mint.as_ref()],
        bump = converter.bump,
        constraint = !converter.paused @ ConverterError::ConverterPaused,
    )]
    pub converter: Box<Account<'info, ConverterState>>,

    #[account(mut, address = converter.backing_account)]
    pub backing_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: cross-ledger transport program
    #[account(address = converter.transport_program)]
    pub transport_program: UncheckedAccount<'info>,

    /// CHECK: transport config/state account
    #[account(mut)]
    pub transport_config: UncheckedAccount<'info>,

    /// CHECK: transport custody for the underlying mint
    #[account(mut)]
    pub transport_custody: UncheckedAccount<'info>,

    pub token_2022_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<MigrateBacking>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let program_id = ctx.program_id;
    let accs = &mut *ctx.accounts;

    require!(amount > 0, ConverterError::InvalidAmount);

    let migratable = accs.converter.migratable_backing(accs.backing_account.amount)?;
    let migrate = amount.min(migratable);
    if migrate == 0 {
        msg!(
            "backing {} at or below local floor {}",
            accs.backing_account.amount,
            accs.converter.minimum_local_backing(accs.backing_account.amount)?
        );
        return Err(error!(ConverterError::NothingToMigrate));
    }

    // Commit the running total before the transport CPIs can observe state.
    accs.converter.record_migration(migrate)?;
    accs.converter.exit(program_id)?;

    let underlying_key = accs.converter.underlying_mint;
    let bump = accs.converter.bump;
    let signer_seeds: &[&[&[u8]]] =
        &[&[CONVERTER_STATE_SEED, underlying_key.as_ref(), &[bump]]];

    let destination_ledger_id = accs.converter.destination_ledger_id;
    let destination_address = accs.converter.destination_address;

    let transport_program = accs.transport_program.to_account_info();
    let transport_config = accs.transport_config.to_account_info();
    let transport_custody = accs.transport_custody.to_account_info();
    let from = accs.backing_account.to_account_info();
    let authority = accs.converter.to_account_info();
    let token_program = accs.token_2022_program.to_account_info();

    let asset_leg = TransportAssetCpi {
        program: &transport_program,
        config: &transport_config,
        custody: &transport_custody,
        from: &from,
        authority: &authority,
        token_program: &token_program,
    };
    asset_leg.bridge_asset(
        destination_ledger_id,
        destination_address,
        migrate,
        true,
        signer_seeds,
    )?;

    let payload = CrossLedgerInstruction::CompleteMigration {
        shares: migrate,
        assets: migrate,
    }
    .encode()?;

    let message_leg = TransportMessageCpi {
        program: &transport_program,
        config: &transport_config,
        authority: &authority,
    };
    message_leg.bridge_message(
        destination_ledger_id,
        destination_address,
        true,
        payload,
        signer_seeds,
    )?;

    accs.backing_account.reload()?;

    emit!(BackingMigrated {
        converter: accs.converter.key(),
        destination_ledger_id,
        amount: migrate,
        remaining_backing: accs.backing_account.amount,
        total_migrated: accs.converter.total_migrated,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Migrated {} backing to ledger {}, {} remains local",
        migrate,
        destination_ledger_id,
        accs.backing_account.amount
    );
    Ok(())
}
