//! Admin operations for the converter.

use anchor_lang::prelude::*;

use crate::constants::{CONVERTER_STATE_SEED, PERCENTAGE_DENOMINATOR};
use crate::errors::ConverterError;
use crate::events::{
    ConverterPausedEvent, ConverterUnpausedEvent, NonMigratablePercentageUpdated,
};
use crate::state::ConverterState;

#[derive(Accounts)]
pub struct ConverterAdminOnly<'info> {
    #[account(
        constraint = admin.key() == converter.admin @ ConverterError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [CONVERTER_STATE_SEED, converter.underlying_mint.as_ref()],
        bump = converter.bump,
    )]
    pub converter: Box<Account<'info, ConverterState>>,
}

pub fn pause(ctx: Context<ConverterAdminOnly>) -> Result<()> {
    let clock = Clock::get()?;
    let converter = &mut ctx.accounts.converter;
    converter.paused = true;

    emit!(ConverterPausedEvent {
        converter: converter.key(),
        admin: ctx.accounts.admin.key(),
        timestamp: clock.unix_timestamp,
    });
    msg!("Converter paused");
    Ok(())
}

pub fn unpause(ctx: Context<ConverterAdminOnly>) -> Result<()> {
    let clock = Clock::get()?;
    let converter = &mut ctx.accounts.converter;
    converter.paused = false;

    emit!(ConverterUnpausedEvent {
        converter: converter.key(),
        admin: ctx.accounts.admin.key(),
        timestamp: clock.unix_timestamp,
    });
    msg!("Converter unpaused");
    Ok(())
}

/// Lowering the floor takes effect on the next migration; raising it never
/// claws back backing that already left.
pub fn set_non_migratable_percentage(
    ctx: Context<ConverterAdminOnly>,
    new_percentage: u8,
) -> Result<()> {
    let clock = Clock::get()?;
    require!(
        (new_percentage as u64) <= PERCENTAGE_DENOMINATOR,
        ConverterError::InvalidPercentage
    );

    let converter = &mut ctx.accounts.converter;
    let old = converter.non_migratable_percentage;
    converter.non_migratable_percentage = new_percentage;

    emit!(NonMigratablePercentageUpdated {
        converter: converter.key(),
        old_percentage: old,
        new_percentage,
        timestamp: clock.unix_timestamp,
    });
    msg!("Non-migratable percentage {}% -> {}%", old, new_percentage);
    Ok(())
}
