//! Voluntary contributions into the reserve or the migration fees fund.
//!
//! Both paths stay open while the vault is paused: donations only ever
//! improve solvency, and the fees fund may need topping up before a stuck
//! migration can be retried.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint as MintInterface, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::VAULT_SEED;
use crate::errors::VaultError;
use crate::events::{MigrationFeesDonated, YieldDonated};
use crate::state::VaultState;

#[derive(Accounts)]
pub struct Donate<'info> {
    #[account(mut)]
    pub donor: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Box<Account<'info, VaultState>>,

    #[account(address = vault.underlying_mint)]
    pub underlying_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(
        mut,
        constraint = donor_assets.owner == donor.key() @ VaultError::Unauthorized,
        constraint = donor_assets.mint == vault.underlying_mint @ VaultError::InvalidMint,
    )]
    pub donor_assets: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = vault.reserve_account)]
    pub reserve_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_2022_program: Interface<'info, TokenInterface>,
}

/// Measured transfer into the reserve account. Returns the post-fee delta.
fn pull_donation<'info>(accs: &mut Donate<'info>, amount: u64) -> Result<u64> {
    require!(amount > 0, VaultError::InvalidAmount);

    let balance_before = accs.reserve_account.amount;
    let transfer_ctx = CpiContext::new(
        accs.token_2022_program.to_account_info(),
        TransferChecked {
            from: accs.donor_assets.to_account_info(),
            mint: accs.underlying_mint.to_account_info(),
            to: accs.reserve_account.to_account_info(),
            authority: accs.donor.to_account_info(),
        },
    );
    anchor_spl::token_interface::transfer_checked(
        transfer_ctx,
        amount,
        accs.underlying_mint.decimals,
    )?;
    accs.reserve_account.reload()?;

    let received = accs
        .reserve_account
        .amount
        .checked_sub(balance_before)
        .ok_or(VaultError::MathOverflow)?;
    require!(received > 0, VaultError::InvalidAmount);
    Ok(received)
}

/// Donate assets straight into the backing. No shares are minted, so the
/// donation shows up as collectible surplus.
pub fn donate_as_yield(ctx: Context<Donate>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accs = &mut *ctx.accounts;

    accs.vault.begin_mutating()?;
    let received = pull_donation(accs, amount)?;
    accs.vault.record_yield_donation(received)?;
    accs.vault.end_mutating();

    emit!(YieldDonated {
        vault: accs.vault.key(),
        donor: accs.donor.key(),
        amount: received,
        timestamp: clock.unix_timestamp,
    });

    msg!("Donated {} as yield", received);
    Ok(())
}

/// Donate assets earmarked for covering migration fee discrepancies. The
/// fund sits in the reserve account but is tracked separately and never
/// counts as backing.
pub fn donate_for_completing_migration(ctx: Context<Donate>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accs = &mut *ctx.accounts;

    accs.vault.begin_mutating()?;
    let received = pull_donation(accs, amount)?;
    accs.vault.record_migration_fees_donation(received)?;
    accs.vault.end_mutating();

    emit!(MigrationFeesDonated {
        vault: accs.vault.key(),
        donor: accs.donor.key(),
        amount: received,
        fund_balance: accs.vault.migration_fees_fund,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Donated {} to migration fees fund, balance {}",
        received,
        accs.vault.migration_fees_fund
    );
    Ok(())
}
