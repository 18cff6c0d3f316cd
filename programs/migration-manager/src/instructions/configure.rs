//! Converter routing configuration.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint as MintInterface, TokenAccount, TokenInterface};

use crate::constants::{ESCROW_SEED, MANAGER_SEED, TOKEN_PAIR_SEED};
use crate::errors::ManagerError;
use crate::events::TokenPairConfigured;
use crate::state::{FundingSource, ManagerState, TokenPair};

#[derive(Accounts)]
#[instruction(origin_ledger_id: u32, converter: [u8; 32])]
pub struct ConfigureNativeConverter<'info> {
    #[account(
        mut,
        constraint = admin.key() == manager.admin @ ManagerError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [MANAGER_SEED],
        bump = manager.bump,
    )]
    pub manager: Box<Account<'info, ManagerState>>,

    #[account(
        init_if_needed,
        payer = admin,
        space = TokenPair::LEN,
        seeds = [
            TOKEN_PAIR_SEED,
            manager.key().as_ref(),
            &origin_ledger_id.to_le_bytes(),
            converter.as_ref(),
        ],
        bump,
    )]
    pub token_pair: Box<Account<'info, TokenPair>>,

    /// Destination vault for this pair
    #[account(
        constraint = vault.underlying_mint == underlying_mint.key() @ ManagerError::InvalidAddress,
    )]
    pub vault: Box<Account<'info, vault_token::state::VaultState>>,

    pub underlying_mint: Box<InterfaceAccount<'info, MintInterface>>,

    /// Escrow receiving this pair's asset legs from the transport
    #[account(
        init_if_needed,
        payer = admin,
        seeds = [ESCROW_SEED, token_pair.key().as_ref()],
        bump,
        token::mint = underlying_mint,
        token::authority = manager,
        token::token_program = token_2022_program,
    )]
    pub escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_2022_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// Bind one converter to one vault. One pair per call; re-running updates
/// the funding source or flips `enabled` without reallocating.
pub fn handler(
    ctx: Context<ConfigureNativeConverter>,
    origin_ledger_id: u32,
    converter: [u8; 32],
    funding_source: FundingSource,
    enabled: bool,
) -> Result<()> {
    let clock = Clock::get()?;

    require!(
        origin_ledger_id != ctx.accounts.manager.ledger_id,
        ManagerError::InvalidLedgerId
    );
    require!(converter != [0u8; 32], ManagerError::InvalidAddress);

    let pair = &mut ctx.accounts.token_pair;
    pair.bump = ctx.bumps.token_pair;
    pair.escrow_bump = ctx.bumps.escrow;
    pair.manager = ctx.accounts.manager.key();
    pair.origin_ledger_id = origin_ledger_id;
    pair.converter = converter;
    pair.vault = ctx.accounts.vault.key();
    pair.underlying_mint = ctx.accounts.underlying_mint.key();
    pair.escrow = ctx.accounts.escrow.key();
    pair.funding_source = funding_source;
    pair.enabled = enabled;

    emit!(TokenPairConfigured {
        manager: pair.manager,
        origin_ledger_id,
        converter,
        vault: pair.vault,
        funding_source,
        enabled,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Configured converter pair for ledger {} -> vault {} ({})",
        origin_ledger_id,
        pair.vault,
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
