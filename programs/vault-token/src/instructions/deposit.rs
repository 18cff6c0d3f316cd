//! Deposit underlying assets for claim tokens, locally or bridged out.

use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, MintTo, Token},
    token_interface::{Mint as MintInterface, TokenAccount, TokenInterface, TransferChecked},
};

use crate::constants::VAULT_SEED;
use crate::errors::VaultError;
use crate::events::{ClaimTokensBridged, Deposited};
use crate::state::VaultState;
use crate::transport::TransportAssetCpi;
use crate::yield_vault::{FacilityCpi, YieldVaultState};

/// Push up to `amount_requested` from the reserve account into the yield
/// facility, capped by the facility's declared capacity (CPI failures cannot
/// be caught, so capacity is checked before invoking). Returns the amount
/// actually pushed; the caller keeps the remainder in reserve.
#[inline(never)]
pub(crate) fn push_to_yield_vault<'info>(
    vault: &Account<'info, VaultState>,
    amount_requested: u64,
    facility: &FacilityCpi<'_, 'info>,
    share_account: &mut Box<InterfaceAccount<'info, TokenAccount>>,
    signer_seeds: &[&[&[u8]]],
) -> Result<u64> {
    if amount_requested == 0 {
        return Ok(0);
    }

    let facility_state = YieldVaultState::load(
        facility.state,
        &vault.yield_vault,
        &vault.yield_vault_program,
    )?;
    let push = amount_requested.min(facility_state.max_deposit());
    if push == 0 {
        return Ok(0);
    }

    let shares_before = share_account.amount;
    facility.deposit(push, signer_seeds)?;
    share_account.reload()?;
    let minted = share_account
        .amount
        .checked_sub(shares_before)
        .ok_or(VaultError::MathOverflow)?;

    // Solvency guard: the facility must credit roughly what its own pricing
    // promised, or the position silently leaks value.
    let expected = facility_state.convert_to_shares(push)?;
    let tolerance = (expected as u128)
        .checked_mul(vault.max_slippage_bps as u128)
        .ok_or(VaultError::MathOverflow)?
        / (crate::constants::BPS_DENOMINATOR as u128);
    if (minted as u128) + tolerance < expected as u128 {
        msg!(
            "yield vault minted {} shares for {} assets, expected {}",
            minted,
            push,
            expected
        );
        return Err(error!(VaultError::InsufficientYieldVaultSharesMinted));
    }

    Ok(push)
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    /// CHECK: receiver of the minted claim tokens
    pub receiver: UncheckedAccount<'info>,

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

    /// Depositor's underlying token account
    #[account(
        mut,
        constraint = depositor_assets.owner == depositor.key() @ VaultError::Unauthorized,
        constraint = depositor_assets.mint == vault.underlying_mint @ VaultError::InvalidMint,
    )]
    pub depositor_assets: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = vault.reserve_account)]
    pub reserve_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receiver's claim token account (created if needed)
    #[account(
        init_if_needed,
        payer = depositor,
        associated_token::mint = claim_mint,
        associated_token::authority = receiver,
    )]
    pub receiver_claim: Box<Account<'info, anchor_spl::token::TokenAccount>>,

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

    /// Token-2022 program (underlying)
    pub token_2022_program: Interface<'info, TokenInterface>,

    /// Standard SPL Token program (claim mint)
    pub token_program: Program<'info, Token>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

/// Pull `assets` from the depositor into reserve, measuring the post-fee
/// delta, then split reserve/facility. Returns (received, pushed).
fn pull_and_split<'info>(
    accs: &mut Deposit<'info>,
    program_id: &Pubkey,
    assets: u64,
    new_shares_hint: Option<u64>,
) -> Result<(u64, u64)> {
    require!(assets > 0, VaultError::InvalidAmount);

    accs.vault.begin_mutating()?;
    // Persist the guard before any external call can re-enter.
    accs.vault.exit(program_id)?;

    let balance_before = accs.reserve_account.amount;
    let transfer_ctx = CpiContext::new(
        accs.token_2022_program.to_account_info(),
        TransferChecked {
            from: accs.depositor_assets.to_account_info(),
            mint: accs.underlying_mint.to_account_info(),
            to: accs.reserve_account.to_account_info(),
            authority: accs.depositor.to_account_info(),
        },
    );
    anchor_spl::token_interface::transfer_checked(
        transfer_ctx,
        assets,
        accs.underlying_mint.decimals,
    )?;
    accs.reserve_account.reload()?;
    let received = accs
        .reserve_account
        .amount
        .checked_sub(balance_before)
        .ok_or(VaultError::MathOverflow)?;
    require!(received > 0, VaultError::InvalidAmount);

    let new_shares = new_shares_hint.unwrap_or_else(|| accs.vault.convert_to_shares(received));
    let split = accs.vault.reserve_split(received, new_shares)?;

    let underlying_key = accs.vault.underlying_mint;
    let bump = accs.vault.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, underlying_key.as_ref(), &[bump]]];

    let facility_program = accs.yield_vault_program.to_account_info();
    let facility_state = accs.yield_vault_state.to_account_info();
    let facility_custody = accs.yield_vault_custody.to_account_info();
    let facility_share_mint = accs.yield_share_mint.to_account_info();
    let caller_assets = accs.reserve_account.to_account_info();
    let caller_shares = accs.yield_share_account.to_account_info();
    let authority = accs.vault.to_account_info();
    let token_program = accs.token_2022_program.to_account_info();
    let facility = FacilityCpi {
        program: &facility_program,
        state: &facility_state,
        custody: &facility_custody,
        share_mint: &facility_share_mint,
        caller_assets: &caller_assets,
        caller_shares: &caller_shares,
        authority: &authority,
        token_program: &token_program,
    };

    let pushed = push_to_yield_vault(
        &accs.vault,
        split.to_yield_vault,
        &facility,
        &mut accs.yield_share_account,
        signer_seeds,
    )?;

    Ok((received, pushed))
}

fn mint_claim_tokens<'info>(
    accs: &Deposit<'info>,
    to: AccountInfo<'info>,
    shares: u64,
) -> Result<()> {
    let underlying_key = accs.vault.underlying_mint;
    let bump = accs.vault.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, underlying_key.as_ref(), &[bump]]];

    let mint_ctx = CpiContext::new_with_signer(
        accs.token_program.to_account_info(),
        MintTo {
            mint: accs.claim_mint.to_account_info(),
            to,
            authority: accs.vault.to_account_info(),
        },
        signer_seeds,
    );
    token::mint_to(mint_ctx, shares)
}

pub fn deposit(ctx: Context<Deposit>, assets: u64) -> Result<()> {
    let clock = Clock::get()?;
    let program_id = ctx.program_id;
    let accs = &mut *ctx.accounts;

    let (received, pushed) = pull_and_split(accs, program_id, assets, None)?;
    let shares = accs.vault.convert_to_shares(received);

    mint_claim_tokens(accs, accs.receiver_claim.to_account_info(), shares)?;

    accs.vault.record_deposit(received, shares, pushed)?;
    accs.vault.end_mutating();

    emit!(Deposited {
        depositor: accs.depositor.key(),
        receiver: accs.receiver.key(),
        vault: accs.vault.key(),
        assets_received: received,
        shares_minted: shares,
        kept_in_reserve: received - pushed,
        pushed_to_yield_vault: pushed,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Deposited {} (requested {}), minted {} claim tokens, {} to yield vault",
        received,
        assets,
        shares,
        pushed
    );

    Ok(())
}

/// Exact-share issuance: pulls the pre-fee estimate and requires the measured
/// delta to cover the minted shares; any over-delivery stays in reserve as
/// collectible surplus.
pub fn mint_shares(ctx: Context<Deposit>, shares: u64) -> Result<()> {
    let clock = Clock::get()?;
    let program_id = ctx.program_id;
    let accs = &mut *ctx.accounts;

    require!(shares > 0, VaultError::ZeroShares);
    let required = accs.vault.convert_to_assets(shares);
    let pull = accs.vault.assets_before_transfer_fee(required)?;

    let (received, pushed) = pull_and_split(accs, program_id, pull, Some(shares))?;
    if received < required {
        msg!("measured {} received, {} required for {} shares", received, required, shares);
        return Err(error!(VaultError::InsufficientAssetsReceived));
    }

    mint_claim_tokens(accs, accs.receiver_claim.to_account_info(), shares)?;

    accs.vault.record_deposit(received, shares, pushed)?;
    accs.vault.end_mutating();

    emit!(Deposited {
        depositor: accs.depositor.key(),
        receiver: accs.receiver.key(),
        vault: accs.vault.key(),
        assets_received: received,
        shares_minted: shares,
        kept_in_reserve: received - pushed,
        pushed_to_yield_vault: pushed,
        timestamp: clock.unix_timestamp,
    });

    msg!("Minted {} claim tokens for {} measured assets", shares, received);

    Ok(())
}

// =============================================================================
// DEPOSIT AND BRIDGE
// =============================================================================

#[derive(Accounts)]
pub struct DepositAndBridge<'info> {
    /// Shared deposit surface; the claim tokens are minted to the vault's own
    /// escrow instead of `receiver_claim`
    pub base: Deposit<'info>,

    #[account(mut, address = base.vault.claim_escrow)]
    pub claim_escrow: Box<Account<'info, anchor_spl::token::TokenAccount>>,

    /// CHECK: cross-ledger transport program
    #[account(address = base.vault.transport_program)]
    pub transport_program: UncheckedAccount<'info>,

    /// CHECK: transport config/state account
    #[account(mut)]
    pub transport_config: UncheckedAccount<'info>,

    /// CHECK: transport custody for the claim mint
    #[account(mut)]
    pub transport_custody: UncheckedAccount<'info>,
}

pub fn deposit_and_bridge(
    ctx: Context<DepositAndBridge>,
    assets: u64,
    destination_ledger_id: u32,
    destination_address: [u8; 32],
) -> Result<()> {
    let clock = Clock::get()?;
    let program_id = ctx.program_id;
    let accs = &mut *ctx.accounts;

    require!(
        destination_ledger_id != accs.base.vault.ledger_id,
        VaultError::InvalidLedgerId
    );
    require!(
        destination_address != crate::constants::ZERO_ADDRESS,
        VaultError::InvalidAddress
    );

    let (received, pushed) = pull_and_split(&mut accs.base, program_id, assets, None)?;
    let shares = accs.base.vault.convert_to_shares(received);

    // Mint to self, then lock into the transport for the destination ledger.
    mint_claim_tokens(&accs.base, accs.claim_escrow.to_account_info(), shares)?;

    let underlying_key = accs.base.vault.underlying_mint;
    let bump = accs.base.vault.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, underlying_key.as_ref(), &[bump]]];

    let transport_program = accs.transport_program.to_account_info();
    let transport_config = accs.transport_config.to_account_info();
    let transport_custody = accs.transport_custody.to_account_info();
    let from = accs.claim_escrow.to_account_info();
    let authority = accs.base.vault.to_account_info();
    let token_program = accs.base.token_program.to_account_info();
    let transport = TransportAssetCpi {
        program: &transport_program,
        config: &transport_config,
        custody: &transport_custody,
        from: &from,
        authority: &authority,
        token_program: &token_program,
    };
    transport.bridge_asset(
        destination_ledger_id,
        destination_address,
        shares,
        true,
        signer_seeds,
    )?;

    accs.base.vault.record_deposit(received, shares, pushed)?;
    accs.base.vault.end_mutating();

    emit!(Deposited {
        depositor: accs.base.depositor.key(),
        receiver: accs.base.vault.key(),
        vault: accs.base.vault.key(),
        assets_received: received,
        shares_minted: shares,
        kept_in_reserve: received - pushed,
        pushed_to_yield_vault: pushed,
        timestamp: clock.unix_timestamp,
    });
    emit!(ClaimTokensBridged {
        vault: accs.base.vault.key(),
        destination_ledger_id,
        destination_address,
        shares,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Deposited {} and bridged {} claim tokens to ledger {}",
        received,
        shares,
        destination_ledger_id
    );

    Ok(())
}
