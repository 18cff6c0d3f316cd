//! Initialize a converter for a local backing asset.

use anchor_lang::prelude::*;
use anchor_spl::{
    token::Token,
    token_interface::{Mint as MintInterface, TokenAccount, TokenInterface},
};

use crate::constants::{
    BACKING_SEED, CONVERTER_STATE_SEED, LOCAL_MINT_SEED, PERCENTAGE_DENOMINATOR,
};
use crate::errors::ConverterError;
use crate::events::ConverterInitialized;
use crate::state::ConverterState;

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct InitializeConverterParams {
    /// This ledger's id on the transport
    pub ledger_id: u32,
    /// Main ledger hosting the destination vault
    pub destination_ledger_id: u32,
    /// Migration recipient on the main ledger
    pub destination_address: [u8; 32],
    /// Fraction of the current backing balance that must stay local (whole percents)
    pub non_migratable_percentage: u8,
    pub transport_program: Pubkey,
}

#[derive(Accounts)]
pub struct InitializeConverter<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Local backing asset mint (Token-2022, may carry a transfer fee)
    pub underlying_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(
        init,
        payer = admin,
        space = ConverterState::LEN,
        seeds = [CONVERTER_STATE_SEED, underlying_mint.key().as_ref()],
        bump
    )]
    pub converter: Box<Account<'info, ConverterState>>,

    /// Local backing token account
    #[account(
        init,
        payer = admin,
        seeds = [BACKING_SEED, converter.key().as_ref()],
        bump,
        token::mint = underlying_mint,
        token::authority = converter,
        token::token_program = token_2022_program,
    )]
    pub backing_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Local claim-token representation mint (standard SPL, decimals match
    /// the underlying)
    #[account(
        init,
        payer = admin,
        seeds = [LOCAL_MINT_SEED, converter.key().as_ref()],
        bump,
        mint::decimals = underlying_mint.decimals,
        mint::authority = converter,
    )]
    pub local_mint: Box<Account<'info, anchor_spl::token::Mint>>,

    /// Token-2022 program (underlying)
    pub token_2022_program: Interface<'info, TokenInterface>,

    /// Standard SPL Token program (local mint)
    pub token_program: Program<'info, Token>,

    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handler(ctx: Context<InitializeConverter>, params: InitializeConverterParams) -> Result<()> {
    let clock = Clock::get()?;

    require!(
        (params.non_migratable_percentage as u64) <= PERCENTAGE_DENOMINATOR,
        ConverterError::InvalidPercentage
    );
    require!(
        params.destination_ledger_id != params.ledger_id,
        ConverterError::InvalidAddress
    );
    require!(
        params.destination_address != [0u8; 32],
        ConverterError::InvalidAddress
    );
    require!(
        params.transport_program != Pubkey::default(),
        ConverterError::InvalidAddress
    );

    let converter = &mut ctx.accounts.converter;
    converter.bump = ctx.bumps.converter;
    converter.version = 1;
    converter.admin = ctx.accounts.admin.key();
    converter.underlying_mint = ctx.accounts.underlying_mint.key();
    converter.underlying_decimals = ctx.accounts.underlying_mint.decimals;
    converter.local_mint = ctx.accounts.local_mint.key();
    converter.backing_account = ctx.accounts.backing_account.key();
    converter.transport_program = params.transport_program;
    converter.ledger_id = params.ledger_id;
    converter.destination_ledger_id = params.destination_ledger_id;
    converter.destination_address = params.destination_address;
    converter.non_migratable_percentage = params.non_migratable_percentage;
    converter.total_issued = 0;
    converter.total_migrated = 0;
    converter.paused = false;
    converter._reserved = [0u8; 32];

    emit!(ConverterInitialized {
        converter: converter.key(),
        underlying_mint: converter.underlying_mint,
        local_mint: converter.local_mint,
        destination_ledger_id: converter.destination_ledger_id,
        non_migratable_percentage: converter.non_migratable_percentage,
        admin: converter.admin,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Initialized converter for mint {} -> ledger {}",
        converter.underlying_mint,
        converter.destination_ledger_id
    );
    Ok(())
}
