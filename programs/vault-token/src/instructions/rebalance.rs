//! Bring the liquid reserve back to its target percentage.
//!
//! Works in both directions: replenish pulls from the yield facility after a
//! reserve-heavy withdrawal pattern, offload pushes excess back to work.
//! Deliberately callable while paused so an operator can restore liquidity
//! before unpausing.

use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};

use crate::constants::VAULT_SEED;
use crate::errors::VaultError;
use crate::events::ReserveRebalanced;
use crate::instructions::deposit::push_to_yield_vault;
use crate::instructions::withdraw::pull_from_yield_vault;
use crate::state::{RebalanceAction, VaultState};
use crate::yield_vault::{FacilityCpi, YieldVaultState};

#[derive(Accounts)]
pub struct Rebalance<'info> {
    #[account(
        constraint = admin.key() == vault.admin @ VaultError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Box<Account<'info, VaultState>>,

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

    pub token_2022_program: Interface<'info, TokenInterface>,
}

/// `allow_down` permits offloading excess reserve; `force` turns a no-op
/// replenish into an error so keepers notice a facility with no liquidity.
pub fn handler(ctx: Context<Rebalance>, allow_down: bool, force: bool) -> Result<()> {
    let clock = Clock::get()?;
    let program_id = ctx.program_id;
    let accs = &mut *ctx.accounts;

    accs.vault.begin_mutating()?;
    accs.vault.exit(program_id)?;

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

    let plan = accs.vault.rebalance_plan(
        facility_state.max_deposit(),
        facility_state.max_withdraw().min(staked_value),
        allow_down,
    )?;

    let underlying_key = accs.vault.underlying_mint;
    let bump = accs.vault.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, underlying_key.as_ref(), &[bump]]];

    let (replenished, offloaded) = match plan {
        RebalanceAction::Balanced => {
            if force {
                msg!(
                    "reserve {} already at or above target, nothing to replenish",
                    accs.vault.reserved_assets
                );
                return Err(error!(VaultError::NoNeedToReplenishReserve));
            }
            accs.vault.end_mutating();
            return Ok(());
        }
        RebalanceAction::Starved => {
            if force {
                msg!(
                    "reserve {} below target but yield vault liquidity is {}",
                    accs.vault.reserved_assets,
                    facility_state.max_withdraw().min(staked_value)
                );
                return Err(error!(VaultError::YieldVaultIlliquid));
            }
            accs.vault.end_mutating();
            return Ok(());
        }
        RebalanceAction::Replenish(amount) => {
            let received = pull_from_yield_vault(
                &accs.vault,
                amount,
                &facility,
                &mut accs.reserve_account,
                &mut accs.yield_share_account,
                signer_seeds,
            )?;
            accs.vault.reserved_assets = accs
                .vault
                .reserved_assets
                .checked_add(received)
                .ok_or(VaultError::MathOverflow)?;
            (received, 0)
        }
        RebalanceAction::Offload(amount) => {
            let pushed = push_to_yield_vault(
                &accs.vault,
                amount,
                &facility,
                &mut accs.yield_share_account,
                signer_seeds,
            )?;
            accs.vault.reserved_assets = accs
                .vault
                .reserved_assets
                .checked_sub(pushed)
                .ok_or(VaultError::MathOverflow)?;
            (0, pushed)
        }
    };

    accs.vault.end_mutating();

    emit!(ReserveRebalanced {
        vault: accs.vault.key(),
        replenished,
        offloaded,
        reserved_assets: accs.vault.reserved_assets,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Rebalanced reserve: +{} -{}, now {}",
        replenished,
        offloaded,
        accs.vault.reserved_assets
    );

    Ok(())
}
