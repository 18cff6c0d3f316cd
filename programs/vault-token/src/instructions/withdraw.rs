//! Withdraw underlying assets by burning claim tokens.
//!
//! Withdrawals are all-or-nothing: served from reserve first, any shortfall
//! pulled from the yield facility, and the whole call fails with
//! `AssetsTooLarge` rather than partially satisfying a request.

use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;
use anchor_spl::{
    token::{self, Burn, Token},
    token_interface::{Mint as MintInterface, TokenAccount, TokenInterface, TransferChecked},
};

use crate::constants::VAULT_SEED;
use crate::errors::VaultError;
use crate::events::Withdrawn;
use crate::state::VaultState;
use crate::transport::TransportClaimCpi;
use crate::yield_vault::{FacilityCpi, YieldVaultState};

/// Pull `amount` of assets from the facility into reserve, measuring the
/// delta and guarding the share burn against the slippage tolerance.
/// Returns the measured assets received.
#[inline(never)]
pub(crate) fn pull_from_yield_vault<'info>(
    vault: &Account<'info, VaultState>,
    amount: u64,
    facility: &FacilityCpi<'_, 'info>,
    reserve_account: &mut Box<InterfaceAccount<'info, TokenAccount>>,
    share_account: &mut Box<InterfaceAccount<'info, TokenAccount>>,
    signer_seeds: &[&[&[u8]]],
) -> Result<u64> {
    let facility_state = YieldVaultState::load(
        facility.state,
        &vault.yield_vault,
        &vault.yield_vault_program,
    )?;

    let reserve_before = reserve_account.amount;
    let shares_before = share_account.amount;
    facility.withdraw(amount, signer_seeds)?;
    reserve_account.reload()?;
    share_account.reload()?;

    let received = reserve_account
        .amount
        .checked_sub(reserve_before)
        .ok_or(VaultError::MathOverflow)?;
    if received < amount {
        msg!("yield vault delivered {} of {} requested", received, amount);
        return Err(error!(VaultError::InsufficientAssetsReceived));
    }

    let burned = shares_before
        .checked_sub(share_account.amount)
        .ok_or(VaultError::MathOverflow)?;
    let expected = facility_state.convert_to_shares(amount)?;
    let tolerance = (expected as u128)
        .checked_mul(vault.max_slippage_bps as u128)
        .ok_or(VaultError::MathOverflow)?
        / (crate::constants::BPS_DENOMINATOR as u128);
    if (burned as u128) > (expected as u128) + tolerance {
        msg!(
            "yield vault burned {} shares for {} assets, expected {}",
            burned,
            amount,
            expected
        );
        return Err(error!(VaultError::ExcessiveYieldVaultSharesBurned));
    }

    Ok(received)
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

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

    /// Owner's claim token account
    #[account(
        mut,
        constraint = owner_claim.owner == owner.key() @ VaultError::Unauthorized,
        constraint = owner_claim.mint == vault.claim_mint @ VaultError::InvalidMint,
    )]
    pub owner_claim: Box<Account<'info, anchor_spl::token::TokenAccount>>,

    #[account(mut, address = vault.reserve_account)]
    pub reserve_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Destination for the withdrawn underlying
    #[account(
        mut,
        constraint = receiver_assets.mint == vault.underlying_mint @ VaultError::InvalidMint,
    )]
    pub receiver_assets: Box<InterfaceAccount<'info, TokenAccount>>,

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
}

fn execute_withdraw<'info>(
    accs: &mut Withdraw<'info>,
    program_id: &Pubkey,
    assets: u64,
) -> Result<()> {
    let clock = Clock::get()?;

    require!(assets > 0, VaultError::InvalidAmount);
    let shares = accs.vault.convert_to_shares(assets);
    require!(
        accs.owner_claim.amount >= shares,
        VaultError::InsufficientShares
    );

    accs.vault.begin_mutating()?;
    accs.vault.exit(program_id)?;

    let served_from_reserve = assets.min(accs.vault.reserved_assets);
    let shortfall = assets - served_from_reserve;

    let underlying_key = accs.vault.underlying_mint;
    let bump = accs.vault.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, underlying_key.as_ref(), &[bump]]];

    let mut pulled = 0u64;
    if shortfall > 0 {
        let facility_program = accs.yield_vault_program.to_account_info();
        let facility_state_info = accs.yield_vault_state.to_account_info();
        let facility_custody = accs.yield_vault_custody.to_account_info();
        let facility_share_mint = accs.yield_share_mint.to_account_info();
        let caller_assets = accs.reserve_account.to_account_info();
        let caller_shares = accs.yield_share_account.to_account_info();
        let authority = accs.vault.to_account_info();
        let token_program = accs.token_2022_program.to_account_info();
        let facility = FacilityCpi {
            program: &facility_program,
            state: &facility_state_info,
            custody: &facility_custody,
            share_mint: &facility_share_mint,
            caller_assets: &caller_assets,
            caller_shares: &caller_shares,
            authority: &authority,
            token_program: &token_program,
        };

        let facility_state = YieldVaultState::load(
            facility.state,
            &accs.vault.yield_vault,
            &accs.vault.yield_vault_program,
        )?;
        let staked_value = facility_state.convert_to_assets(accs.yield_share_account.amount)?;
        let available = facility_state.max_withdraw().min(staked_value);
        if shortfall > available {
            msg!(
                "withdraw of {} exceeds liquidity: reserve {}, yield vault {}",
                assets,
                accs.vault.reserved_assets,
                available
            );
            return Err(error!(VaultError::AssetsTooLarge));
        }

        pulled = pull_from_yield_vault(
            &accs.vault,
            shortfall,
            &facility,
            &mut accs.reserve_account,
            &mut accs.yield_share_account,
            signer_seeds,
        )?;
    }

    // Burn exactly the shares matching the assets sent.
    let burn_ctx = CpiContext::new(
        accs.token_program.to_account_info(),
        Burn {
            mint: accs.claim_mint.to_account_info(),
            from: accs.owner_claim.to_account_info(),
            authority: accs.owner.to_account_info(),
        },
    );
    token::burn(burn_ctx, shares)?;

    let transfer_ctx = CpiContext::new_with_signer(
        accs.token_2022_program.to_account_info(),
        TransferChecked {
            from: accs.reserve_account.to_account_info(),
            mint: accs.underlying_mint.to_account_info(),
            to: accs.receiver_assets.to_account_info(),
            authority: accs.vault.to_account_info(),
        },
        signer_seeds,
    );
    anchor_spl::token_interface::transfer_checked(
        transfer_ctx,
        assets,
        accs.underlying_mint.decimals,
    )?;

    accs.vault.record_withdrawal(assets, pulled, shares)?;
    accs.vault.end_mutating();

    emit!(Withdrawn {
        owner: accs.owner.key(),
        receiver: accs.receiver_assets.key(),
        vault: accs.vault.key(),
        assets,
        served_from_reserve,
        pulled_from_yield_vault: pulled,
        shares_burned: shares,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Withdrew {}: {} from reserve, {} from yield vault, burned {} claim tokens",
        assets,
        served_from_reserve,
        pulled,
        shares
    );

    Ok(())
}

pub fn withdraw(ctx: Context<Withdraw>, assets: u64) -> Result<()> {
    let program_id = ctx.program_id;
    execute_withdraw(ctx.accounts, program_id, assets)
}

pub fn redeem(ctx: Context<Withdraw>, shares: u64) -> Result<()> {
    let program_id = ctx.program_id;
    let assets = ctx.accounts.vault.convert_to_assets(shares);
    execute_withdraw(ctx.accounts, program_id, assets)
}

// =============================================================================
// CLAIM AND REDEEM
// =============================================================================

#[derive(Accounts)]
pub struct ClaimAndRedeem<'info> {
    pub base: Withdraw<'info>,

    /// CHECK: cross-ledger transport program
    #[account(address = base.vault.transport_program)]
    pub transport_program: UncheckedAccount<'info>,

    /// CHECK: transport config/state account
    #[account(mut)]
    pub transport_config: UncheckedAccount<'info>,
}

/// Claim a bridged-in claim-token leg by proof, then redeem everything that
/// arrived in the same breath.
pub fn claim_and_redeem(ctx: Context<ClaimAndRedeem>, claim_data: Vec<u8>) -> Result<()> {
    let program_id = ctx.program_id;
    let accs = &mut *ctx.accounts;

    let before = accs.base.owner_claim.amount;

    let transport_program = accs.transport_program.to_account_info();
    let transport_config = accs.transport_config.to_account_info();
    let destination = accs.base.owner_claim.to_account_info();
    let token_program = accs.base.token_program.to_account_info();
    let transport = TransportClaimCpi {
        program: &transport_program,
        config: &transport_config,
        destination: &destination,
        token_program: &token_program,
    };
    transport.claim_asset(claim_data)?;

    accs.base.owner_claim.reload()?;
    let shares_claimed = accs
        .base
        .owner_claim
        .amount
        .checked_sub(before)
        .ok_or(VaultError::MathOverflow)?;
    require!(shares_claimed > 0, VaultError::InvalidAmount);

    let assets = accs.base.vault.convert_to_assets(shares_claimed);
    execute_withdraw(&mut accs.base, program_id, assets)
}
