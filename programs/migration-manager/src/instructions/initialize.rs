//! Initialize the singleton manager.

use anchor_lang::prelude::*;

use crate::constants::MANAGER_SEED;
use crate::errors::ManagerError;
use crate::events::ManagerInitialized;
use crate::state::ManagerState;

#[derive(Accounts)]
pub struct InitializeManager<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = ManagerState::LEN,
        seeds = [MANAGER_SEED],
        bump
    )]
    pub manager: Box<Account<'info, ManagerState>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializeManager>,
    transport_program: Pubkey,
    transport_authority: Pubkey,
    ledger_id: u32,
) -> Result<()> {
    let clock = Clock::get()?;

    require!(
        transport_program != Pubkey::default() && transport_authority != Pubkey::default(),
        ManagerError::InvalidAddress
    );

    let manager = &mut ctx.accounts.manager;
    manager.bump = ctx.bumps.manager;
    manager.admin = ctx.accounts.admin.key();
    manager.transport_program = transport_program;
    manager.transport_authority = transport_authority;
    manager.ledger_id = ledger_id;
    manager.paused = false;
    manager._reserved = [0u8; 16];

    emit!(ManagerInitialized {
        manager: manager.key(),
        admin: manager.admin,
        ledger_id,
        timestamp: clock.unix_timestamp,
    });

    msg!("Initialized migration manager on ledger {}", ledger_id);
    Ok(())
}
