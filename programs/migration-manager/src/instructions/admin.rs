//! Admin operations for the manager.

use anchor_lang::prelude::*;

use crate::constants::MANAGER_SEED;
use crate::errors::ManagerError;
use crate::events::{ManagerPausedEvent, ManagerUnpausedEvent};
use crate::state::ManagerState;

#[derive(Accounts)]
pub struct ManagerAdminOnly<'info> {
    #[account(
        constraint = admin.key() == manager.admin @ ManagerError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [MANAGER_SEED],
        bump = manager.bump,
    )]
    pub manager: Box<Account<'info, ManagerState>>,
}

pub fn pause(ctx: Context<ManagerAdminOnly>) -> Result<()> {
    let clock = Clock::get()?;
    let manager = &mut ctx.accounts.manager;
    manager.paused = true;

    emit!(ManagerPausedEvent {
        manager: manager.key(),
        admin: ctx.accounts.admin.key(),
        timestamp: clock.unix_timestamp,
    });
    msg!("Manager paused");
    Ok(())
}

pub fn unpause(ctx: Context<ManagerAdminOnly>) -> Result<()> {
    let clock = Clock::get()?;
    let manager = &mut ctx.accounts.manager;
    manager.paused = false;

    emit!(ManagerUnpausedEvent {
        manager: manager.key(),
        admin: ctx.accounts.admin.key(),
        timestamp: clock.unix_timestamp,
    });
    msg!("Manager unpaused");
    Ok(())
}
