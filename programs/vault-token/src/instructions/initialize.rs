//! Initialize a new vault for an underlying asset.

use anchor_lang::prelude::*;
use anchor_spl::{
    token::Token,
    token_interface::{Mint as MintInterface, TokenAccount, TokenInterface},
};

use crate::constants::{
    CLAIM_ESCROW_SEED, CLAIM_MINT_SEED, MIGRATION_INBOX_SEED, PERCENTAGE_DENOMINATOR,
    RESERVE_SEED, VAULT_SEED,
};
use crate::errors::VaultError;
use crate::events::VaultInitialized;
use crate::state::VaultState;
use crate::yield_vault::YieldVaultState;

/// Initialization parameters; everything operator-tunable lives here.
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct InitializeParams {
    /// This ledger's id on the transport
    pub ledger_id: u32,
    /// Fraction of backing kept immediately liquid (whole percents)
    pub minimum_reserve_percentage: u8,
    /// Received amounts below this stay entirely in reserve
    pub minimum_yield_vault_deposit: u64,
    /// Acceptable facility slippage for drain/withdraw safety checks (bps)
    pub max_slippage_bps: u16,
    /// Per-asset transfer fee estimator (bps, 0 = identity)
    pub transfer_fee_bps: u16,
    pub yield_recipient: Pubkey,
    pub transport_program: Pubkey,
    pub transport_authority: Pubkey,
    pub migration_manager: Pubkey,
}

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Underlying asset mint (Token-2022, may carry a transfer fee)
    pub underlying_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(
        init,
        payer = admin,
        space = VaultState::LEN,
        seeds = [VAULT_SEED, underlying_mint.key().as_ref()],
        bump
    )]
    pub vault: Box<Account<'info, VaultState>>,

    /// Liquid reserve token account
    #[account(
        init,
        payer = admin,
        seeds = [RESERVE_SEED, vault.key().as_ref()],
        bump,
        token::mint = underlying_mint,
        token::authority = vault,
        token::token_program = token_2022_program,
    )]
    pub reserve_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Inbox for asset legs delivered directly to this vault
    #[account(
        init,
        payer = admin,
        seeds = [MIGRATION_INBOX_SEED, vault.key().as_ref()],
        bump,
        token::mint = underlying_mint,
        token::authority = vault,
        token::token_program = token_2022_program,
    )]
    pub migration_inbox: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Claim token mint (standard SPL, decimals match the underlying)
    #[account(
        init,
        payer = admin,
        seeds = [CLAIM_MINT_SEED, vault.key().as_ref()],
        bump,
        mint::decimals = underlying_mint.decimals,
        mint::authority = vault,
    )]
    pub claim_mint: Box<Account<'info, anchor_spl::token::Mint>>,

    /// Vault-owned claim escrow for bridged/phantom mints
    #[account(
        init,
        payer = admin,
        seeds = [CLAIM_ESCROW_SEED, vault.key().as_ref()],
        bump,
        token::mint = claim_mint,
        token::authority = vault,
        token::token_program = token_program,
    )]
    pub claim_escrow: Box<Account<'info, anchor_spl::token::TokenAccount>>,

    /// CHECK: external yield facility program
    pub yield_vault_program: UncheckedAccount<'info>,

    /// CHECK: facility state account, validated against the program in the handler
    pub yield_vault_state: UncheckedAccount<'info>,

    /// Vault's facility share token account, created externally for the
    /// facility's share mint
    #[account(
        constraint = yield_share_account.owner == vault.key() @ VaultError::InvalidYieldVaultAccount,
    )]
    pub yield_share_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token-2022 program (underlying)
    pub token_2022_program: Interface<'info, TokenInterface>,

    /// Standard SPL Token program (claim mint)
    pub token_program: Program<'info, Token>,

    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handler(ctx: Context<InitializeVault>, params: InitializeParams) -> Result<()> {
    let clock = Clock::get()?;

    require!(
        (params.minimum_reserve_percentage as u64) <= PERCENTAGE_DENOMINATOR,
        VaultError::InvalidPercentage
    );
    require!(
        (params.max_slippage_bps as u64) < crate::constants::BPS_DENOMINATOR,
        VaultError::InvalidPercentage
    );
    require!(
        (params.transfer_fee_bps as u64) < crate::constants::BPS_DENOMINATOR,
        VaultError::InvalidPercentage
    );
    require!(
        params.yield_recipient != Pubkey::default(),
        VaultError::InvalidAddress
    );
    require!(
        params.transport_program != Pubkey::default()
            && params.transport_authority != Pubkey::default()
            && params.migration_manager != Pubkey::default(),
        VaultError::InvalidAddress
    );

    // The facility must exist and be readable before any assets route to it.
    YieldVaultState::load(
        &ctx.accounts.yield_vault_state,
        ctx.accounts.yield_vault_state.key,
        ctx.accounts.yield_vault_program.key,
    )?;

    let vault = &mut ctx.accounts.vault;
    vault.bump = ctx.bumps.vault;
    vault.version = 1;
    vault.admin = ctx.accounts.admin.key();
    vault.underlying_mint = ctx.accounts.underlying_mint.key();
    vault.underlying_decimals = ctx.accounts.underlying_mint.decimals;
    vault.claim_mint = ctx.accounts.claim_mint.key();
    vault.reserve_account = ctx.accounts.reserve_account.key();
    vault.claim_escrow = ctx.accounts.claim_escrow.key();
    vault.migration_inbox = ctx.accounts.migration_inbox.key();
    vault.yield_vault_program = ctx.accounts.yield_vault_program.key();
    vault.yield_vault = ctx.accounts.yield_vault_state.key();
    vault.yield_share_account = ctx.accounts.yield_share_account.key();
    vault.yield_recipient = params.yield_recipient;
    vault.transport_program = params.transport_program;
    vault.transport_authority = params.transport_authority;
    vault.migration_manager = params.migration_manager;
    vault.ledger_id = params.ledger_id;
    vault.minimum_reserve_percentage = params.minimum_reserve_percentage;
    vault.minimum_yield_vault_deposit = params.minimum_yield_vault_deposit;
    vault.max_slippage_bps = params.max_slippage_bps;
    vault.transfer_fee_bps = params.transfer_fee_bps;
    vault.reserved_assets = 0;
    vault.migration_fees_fund = 0;
    vault.net_collected_yield = 0;
    vault.total_shares = 0;
    vault.paused = false;
    vault.entered = false;
    vault._reserved = [0u8; 32];

    emit!(VaultInitialized {
        vault: vault.key(),
        underlying_mint: vault.underlying_mint,
        claim_mint: vault.claim_mint,
        ledger_id: vault.ledger_id,
        minimum_reserve_percentage: vault.minimum_reserve_percentage,
        admin: vault.admin,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Initialized vault for mint {} on ledger {}, reserve target {}%",
        vault.underlying_mint,
        vault.ledger_id,
        vault.minimum_reserve_percentage
    );

    Ok(())
}
