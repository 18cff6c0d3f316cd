//! Backing migration from secondary ledgers.
//!
//! When a converter on another ledger retires locally-issued claim tokens,
//! their backing travels here and an equal number of claim tokens must exist
//! on this ledger to keep the global supply honest. Reconciliation is
//! all-or-nothing: a transfer-fee shortfall is covered from the migration
//! fees fund or the whole completion reverts, and the freshly minted claim
//! tokens are forwarded to the non-claimable zero address on the origin
//! ledger so they can never be double-claimed.
//!
//! Two delivery paths land here: the migration manager CPI
//! (`complete_migration`) and direct transport messages
//! (`on_message_received`).

use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;
use anchor_spl::{
    token::{self, MintTo, Token},
    token_interface::{Mint as MintInterface, TokenAccount, TokenInterface, TransferChecked},
};

use crate::constants::{CONVERTER_BINDING_SEED, VAULT_SEED, ZERO_ADDRESS};
use crate::errors::VaultError;
use crate::events::{CustomMessageReceived, MigrationCompleted, PhantomLiquidityForwarded};
use crate::instructions::deposit::push_to_yield_vault;
use crate::message::CrossLedgerInstruction;
use crate::state::{ConverterBinding, VaultState};
use crate::transport::TransportAssetCpi;
use crate::yield_vault::FacilityCpi;

/// Plan, commit, mint, and forward a validated migration. `declared_assets`
/// is the pre-fee amount the origin ledger sent; `assets_received` is the
/// measured post-fee delta already sitting in reserve custody.
#[inline(never)]
fn settle_migration<'info>(
    vault: &mut Box<Account<'info, VaultState>>,
    origin_ledger_id: u32,
    shares: u64,
    declared_assets: u64,
    assets_received: u64,
    facility: &FacilityCpi<'_, 'info>,
    yield_share_account: &mut Box<InterfaceAccount<'info, TokenAccount>>,
    claim_mint: &AccountInfo<'info>,
    claim_escrow: &AccountInfo<'info>,
    transport: &TransportAssetCpi<'_, 'info>,
    token_program: &AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    timestamp: i64,
) -> Result<()> {
    let plan = match vault.plan_migration(shares, assets_received) {
        Ok(plan) => plan,
        Err(err) => {
            msg!(
                "migration from ledger {} failed: {} shares need {}, received {}, fees fund {}",
                origin_ledger_id,
                shares,
                vault.convert_to_assets(shares),
                assets_received,
                vault.migration_fees_fund
            );
            return Err(err);
        }
    };

    let pushed = push_to_yield_vault(
        vault,
        plan.split.to_yield_vault,
        facility,
        yield_share_account,
        signer_seeds,
    )?;
    vault.record_migration(&plan, pushed)?;

    // Mint the migrated supply to our own escrow, then forward it to the
    // zero address on the origin ledger. Nobody can claim that leg, but it
    // keeps per-ledger accounting consistent with the retired local issue.
    let mint_ctx = CpiContext::new_with_signer(
        token_program.clone(),
        MintTo {
            mint: claim_mint.clone(),
            to: claim_escrow.clone(),
            authority: vault.to_account_info(),
        },
        signer_seeds,
    );
    token::mint_to(mint_ctx, shares)?;

    transport.bridge_asset(origin_ledger_id, ZERO_ADDRESS, shares, true, signer_seeds)?;

    emit!(MigrationCompleted {
        vault: vault.key(),
        origin_ledger_id,
        shares: plan.shares,
        assets_before_fee: declared_assets,
        assets_after_fee: plan.assets_received,
        discrepancy: plan.covered_discrepancy,
        fees_fund_balance: vault.migration_fees_fund,
        timestamp,
    });
    emit!(PhantomLiquidityForwarded {
        vault: vault.key(),
        origin_ledger_id,
        shares,
        timestamp,
    });

    msg!(
        "Completed migration from ledger {}: {} shares, received {}, discrepancy {}",
        origin_ledger_id,
        shares,
        assets_received,
        plan.covered_discrepancy
    );

    Ok(())
}

// =============================================================================
// MANAGER PATH
// =============================================================================

#[derive(Accounts)]
pub struct CompleteMigration<'info> {
    /// Migration manager authority, invoking via CPI
    #[account(
        constraint = authority.key() == vault.migration_manager @ VaultError::Unauthorized,
    )]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
        constraint = !vault.paused @ VaultError::VaultPaused,
    )]
    pub vault: Box<Account<'info, VaultState>>,

    #[account(address = vault.underlying_mint)]
    pub underlying_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(mut, address = vault.claim_mint)]
    pub claim_mint: Box<Account<'info, anchor_spl::token::Mint>>,

    #[account(mut, address = vault.claim_escrow)]
    pub claim_escrow: Box<Account<'info, anchor_spl::token::TokenAccount>>,

    /// Manager-held escrow funding this migration
    #[account(
        mut,
        constraint = funding_assets.mint == vault.underlying_mint @ VaultError::InvalidMint,
    )]
    pub funding_assets: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = vault.reserve_account)]
    pub reserve_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: external yield facility program
    #[account(address = vault.yield_vault_program)]
    pub yield_vault_program: UncheckedAccount<'info>,

    /// CHECK: facility state, validated against the vault's config in the handler
    #[account(mut)]
    pub yield_vault_state: UncheckedAccount<'info>,

    /// CHECK: facility underlying custody
    #[account(mut)]
    pub yield_vault_custody: UncheckedAccount<'info>,

    /// CHECK: facility share mint
    #[account(mut)]
    pub yield_share_mint: UncheckedAccount<'info>,

    #[account(mut, address = vault.yield_share_account)]
    pub yield_share_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: cross-ledger transport program
    #[account(address = vault.transport_program)]
    pub transport_program: UncheckedAccount<'info>,

    /// CHECK: transport config/state account
    #[account(mut)]
    pub transport_config: UncheckedAccount<'info>,

    /// CHECK: transport custody for the claim mint
    #[account(mut)]
    pub transport_custody: UncheckedAccount<'info>,

    pub token_2022_program: Interface<'info, TokenInterface>,
    pub token_program: Program<'info, Token>,
}

pub fn complete_migration(
    ctx: Context<CompleteMigration>,
    origin_ledger_id: u32,
    shares: u64,
    assets: u64,
) -> Result<()> {
    let clock = Clock::get()?;
    let program_id = ctx.program_id;
    let accs = &mut *ctx.accounts;

    require!(
        origin_ledger_id != accs.vault.ledger_id,
        VaultError::InvalidLedgerId
    );
    require!(shares > 0, VaultError::ZeroShares);

    accs.vault.begin_mutating()?;
    accs.vault.exit(program_id)?;

    // Pull the declared asset leg from the manager's escrow, measuring the
    // post-fee delta. The manager signs as the escrow authority.
    let pull = assets.min(accs.funding_assets.amount);
    let balance_before = accs.reserve_account.amount;
    if pull > 0 {
        let transfer_ctx = CpiContext::new(
            accs.token_2022_program.to_account_info(),
            TransferChecked {
                from: accs.funding_assets.to_account_info(),
                mint: accs.underlying_mint.to_account_info(),
                to: accs.reserve_account.to_account_info(),
                authority: accs.authority.to_account_info(),
            },
        );
        anchor_spl::token_interface::transfer_checked(
            transfer_ctx,
            pull,
            accs.underlying_mint.decimals,
        )?;
        accs.reserve_account.reload()?;
    }
    let received = accs
        .reserve_account
        .amount
        .checked_sub(balance_before)
        .ok_or(VaultError::MathOverflow)?;

    let underlying_key = accs.vault.underlying_mint;
    let bump = accs.vault.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, underlying_key.as_ref(), &[bump]]];

    let facility_program = accs.yield_vault_program.to_account_info();
    let facility_state = accs.yield_vault_state.to_account_info();
    let facility_custody = accs.yield_vault_custody.to_account_info();
    let facility_share_mint = accs.yield_share_mint.to_account_info();
    let caller_assets = accs.reserve_account.to_account_info();
    let caller_shares = accs.yield_share_account.to_account_info();
    let vault_info = accs.vault.to_account_info();
    let token_2022 = accs.token_2022_program.to_account_info();
    let facility = FacilityCpi {
        program: &facility_program,
        state: &facility_state,
        custody: &facility_custody,
        share_mint: &facility_share_mint,
        caller_assets: &caller_assets,
        caller_shares: &caller_shares,
        authority: &vault_info,
        token_program: &token_2022,
    };

    let transport_program = accs.transport_program.to_account_info();
    let transport_config = accs.transport_config.to_account_info();
    let transport_custody = accs.transport_custody.to_account_info();
    let escrow_info = accs.claim_escrow.to_account_info();
    let token_program_info = accs.token_program.to_account_info();
    let transport = TransportAssetCpi {
        program: &transport_program,
        config: &transport_config,
        custody: &transport_custody,
        from: &escrow_info,
        authority: &vault_info,
        token_program: &token_program_info,
    };

    let claim_mint_info = accs.claim_mint.to_account_info();
    settle_migration(
        &mut accs.vault,
        origin_ledger_id,
        shares,
        assets,
        received,
        &facility,
        &mut accs.yield_share_account,
        &claim_mint_info,
        &escrow_info,
        &transport,
        &token_program_info,
        signer_seeds,
        clock.unix_timestamp,
    )?;

    accs.vault.end_mutating();
    Ok(())
}

// =============================================================================
// DIRECT MESSAGE PATH
// =============================================================================

#[derive(Accounts)]
#[instruction(origin_ledger_id: u32)]
pub struct OnMessageReceived<'info> {
    /// Transport endpoint authority, proving the message came through the
    /// transport
    #[account(
        constraint = transport_authority.key() == vault.transport_authority @ VaultError::Unauthorized,
    )]
    pub transport_authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
        constraint = !vault.paused @ VaultError::VaultPaused,
    )]
    pub vault: Box<Account<'info, VaultState>>,

    /// Bound converter for the origin ledger; the only address whose
    /// messages can mint here
    #[account(
        seeds = [CONVERTER_BINDING_SEED, vault.key().as_ref(), &origin_ledger_id.to_le_bytes()],
        bump = converter_binding.bump,
    )]
    pub converter_binding: Box<Account<'info, ConverterBinding>>,

    #[account(address = vault.underlying_mint)]
    pub underlying_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(mut, address = vault.claim_mint)]
    pub claim_mint: Box<Account<'info, anchor_spl::token::Mint>>,

    #[account(mut, address = vault.claim_escrow)]
    pub claim_escrow: Box<Account<'info, anchor_spl::token::TokenAccount>>,

    /// Inbox holding the asset leg the transport delivered ahead of this
    /// message
    #[account(mut, address = vault.migration_inbox)]
    pub migration_inbox: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = vault.reserve_account)]
    pub reserve_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: external yield facility program
    #[account(address = vault.yield_vault_program)]
    pub yield_vault_program: UncheckedAccount<'info>,

    /// CHECK: facility state, validated against the vault's config in the handler
    #[account(mut)]
    pub yield_vault_state: UncheckedAccount<'info>,

    /// CHECK: facility underlying custody
    #[account(mut)]
    pub yield_vault_custody: UncheckedAccount<'info>,

    /// CHECK: facility share mint
    #[account(mut)]
    pub yield_share_mint: UncheckedAccount<'info>,

    #[account(mut, address = vault.yield_share_account)]
    pub yield_share_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: cross-ledger transport program
    #[account(address = vault.transport_program)]
    pub transport_program: UncheckedAccount<'info>,

    /// CHECK: transport config/state account
    #[account(mut)]
    pub transport_config: UncheckedAccount<'info>,

    /// CHECK: transport custody for the claim mint
    #[account(mut)]
    pub transport_custody: UncheckedAccount<'info>,

    pub token_2022_program: Interface<'info, TokenInterface>,
    pub token_program: Program<'info, Token>,
}

pub fn on_message_received(
    ctx: Context<OnMessageReceived>,
    origin_ledger_id: u32,
    origin_address: [u8; 32],
    payload: Vec<u8>,
) -> Result<()> {
    let clock = Clock::get()?;
    let program_id = ctx.program_id;
    let accs = &mut *ctx.accounts;

    require!(
        origin_ledger_id != accs.vault.ledger_id,
        VaultError::InvalidLedgerId
    );
    require!(
        accs.converter_binding.authorizes(&origin_address),
        VaultError::Unauthorized
    );

    let instruction = CrossLedgerInstruction::decode(&payload)?;
    let (shares, assets) = match instruction {
        CrossLedgerInstruction::CompleteMigration { shares, assets } => (shares, assets),
        CrossLedgerInstruction::Custom { payload } => {
            // Not a protocol operation; surfaced for off-chain consumers.
            emit!(CustomMessageReceived {
                vault: accs.vault.key(),
                origin_ledger_id,
                origin_address,
                payload_len: payload.len() as u32,
                timestamp: clock.unix_timestamp,
            });
            return Ok(());
        }
    };
    require!(shares > 0, VaultError::ZeroShares);

    // The asset leg must already sit in the inbox; the transport delivers
    // assets and the message independently, and the message can only be
    // honored once its backing is physically here.
    let expected = accs.vault.assets_after_transfer_fee(assets)?;
    if accs.migration_inbox.amount < expected {
        msg!(
            "inbox holds {}, message declares {} ({} post-fee)",
            accs.migration_inbox.amount,
            assets,
            expected
        );
        return Err(error!(VaultError::MigrationInboxShortfall));
    }

    accs.vault.begin_mutating()?;
    accs.vault.exit(program_id)?;

    let underlying_key = accs.vault.underlying_mint;
    let bump = accs.vault.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, underlying_key.as_ref(), &[bump]]];

    // Move the backing from inbox to reserve custody, measuring the delta
    // since the underlying fee applies to this hop too.
    let balance_before = accs.reserve_account.amount;
    let transfer_ctx = CpiContext::new_with_signer(
        accs.token_2022_program.to_account_info(),
        TransferChecked {
            from: accs.migration_inbox.to_account_info(),
            mint: accs.underlying_mint.to_account_info(),
            to: accs.reserve_account.to_account_info(),
            authority: accs.vault.to_account_info(),
        },
        signer_seeds,
    );
    anchor_spl::token_interface::transfer_checked(
        transfer_ctx,
        expected,
        accs.underlying_mint.decimals,
    )?;
    accs.reserve_account.reload()?;
    let received = accs
        .reserve_account
        .amount
        .checked_sub(balance_before)
        .ok_or(VaultError::MathOverflow)?;

    let facility_program = accs.yield_vault_program.to_account_info();
    let facility_state = accs.yield_vault_state.to_account_info();
    let facility_custody = accs.yield_vault_custody.to_account_info();
    let facility_share_mint = accs.yield_share_mint.to_account_info();
    let caller_assets = accs.reserve_account.to_account_info();
    let caller_shares = accs.yield_share_account.to_account_info();
    let vault_info = accs.vault.to_account_info();
    let token_2022 = accs.token_2022_program.to_account_info();
    let facility = FacilityCpi {
        program: &facility_program,
        state: &facility_state,
        custody: &facility_custody,
        share_mint: &facility_share_mint,
        caller_assets: &caller_assets,
        caller_shares: &caller_shares,
        authority: &vault_info,
        token_program: &token_2022,
    };

    let transport_program = accs.transport_program.to_account_info();
    let transport_config = accs.transport_config.to_account_info();
    let transport_custody = accs.transport_custody.to_account_info();
    let escrow_info = accs.claim_escrow.to_account_info();
    let token_program_info = accs.token_program.to_account_info();
    let transport = TransportAssetCpi {
        program: &transport_program,
        config: &transport_config,
        custody: &transport_custody,
        from: &escrow_info,
        authority: &vault_info,
        token_program: &token_program_info,
    };

    let claim_mint_info = accs.claim_mint.to_account_info();
    settle_migration(
        &mut accs.vault,
        origin_ledger_id,
        shares,
        assets,
        received,
        &facility,
        &mut accs.yield_share_account,
        &claim_mint_info,
        &escrow_info,
        &transport,
        &token_program_info,
        signer_seeds,
        clock.unix_timestamp,
    )?;

    accs.vault.end_mutating();
    Ok(())
}
