//! Yield collection and voluntary return.
//!
//! Surplus backing (facility appreciation, donations, rounding remainders)
//! is realized by minting claim tokens to the configured recipient; the
//! supply grows to match the backing, so full backing is preserved. The
//! recipient can later burn claim tokens to hand yield back, which may push
//! the running net below zero.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Burn, MintTo, Token},
    token_interface::{TokenAccount, TokenInterface},
};

use crate::constants::VAULT_SEED;
use crate::errors::VaultError;
use crate::events::{CollectedYieldReturned, YieldCollected};
use crate::state::VaultState;
use crate::yield_vault::YieldVaultState;

#[derive(Accounts)]
pub struct CollectYield<'info> {
    /// Anyone may trigger collection; proceeds always go to the recipient.
    #[account(mut)]
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
        constraint = !vault.paused @ VaultError::VaultPaused,
    )]
    pub vault: Box<Account<'info, VaultState>>,

    #[account(mut, address = vault.claim_mint)]
    pub claim_mint: Box<Account<'info, anchor_spl::token::Mint>>,

    /// CHECK: configured yield recipient
    #[account(address = vault.yield_recipient)]
    pub yield_recipient: UncheckedAccount<'info>,

    /// Recipient's claim token account (created if needed)
    #[account(
        init_if_needed,
        payer = caller,
        associated_token::mint = claim_mint,
        associated_token::authority = yield_recipient,
    )]
    pub recipient_claim: Box<Account<'info, anchor_spl::token::TokenAccount>>,

    /// CHECK: facility state, validated against the vault's config in the handler
    pub yield_vault_state: UncheckedAccount<'info>,

    #[account(address = vault.yield_share_account)]
    pub yield_share_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_2022_program: Interface<'info, TokenInterface>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

/// `force` turns an empty collection into an error so automated callers can
/// tell "nothing accrued" apart from success.
pub fn collect_yield(ctx: Context<CollectYield>, force: bool) -> Result<()> {
    let clock = Clock::get()?;
    let accs = &mut *ctx.accounts;

    let facility_state = YieldVaultState::load(
        &accs.yield_vault_state,
        &accs.vault.yield_vault,
        &accs.vault.yield_vault_program,
    )?;
    let staked_value = facility_state.convert_to_assets(accs.yield_share_account.amount)?;

    let surplus = accs.vault.collectible_yield(staked_value)?;
    if surplus == 0 {
        if force {
            return Err(error!(VaultError::NoYield));
        }
        return Ok(());
    }

    accs.vault.begin_mutating()?;

    let underlying_key = accs.vault.underlying_mint;
    let bump = accs.vault.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, underlying_key.as_ref(), &[bump]]];

    let shares = accs.vault.convert_to_shares(surplus);
    let mint_ctx = CpiContext::new_with_signer(
        accs.token_program.to_account_info(),
        MintTo {
            mint: accs.claim_mint.to_account_info(),
            to: accs.recipient_claim.to_account_info(),
            authority: accs.vault.to_account_info(),
        },
        signer_seeds,
    );
    token::mint_to(mint_ctx, shares)?;

    accs.vault.record_collected_yield(shares)?;
    accs.vault.end_mutating();

    emit!(YieldCollected {
        vault: accs.vault.key(),
        recipient: accs.vault.yield_recipient,
        amount: shares,
        net_collected_yield: accs.vault.net_collected_yield,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Collected {} yield to {}, net collected {}",
        shares,
        accs.vault.yield_recipient,
        accs.vault.net_collected_yield
    );

    Ok(())
}

#[derive(Accounts)]
pub struct BurnCollectedYield<'info> {
    /// Only the configured recipient can return yield.
    #[account(
        constraint = recipient.key() == vault.yield_recipient @ VaultError::Unauthorized,
    )]
    pub recipient: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Box<Account<'info, VaultState>>,

    #[account(mut, address = vault.claim_mint)]
    pub claim_mint: Box<Account<'info, anchor_spl::token::Mint>>,

    #[account(
        mut,
        constraint = recipient_claim.owner == recipient.key() @ VaultError::Unauthorized,
        constraint = recipient_claim.mint == vault.claim_mint @ VaultError::InvalidMint,
    )]
    pub recipient_claim: Box<Account<'info, anchor_spl::token::TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

/// Burn claim tokens held by the yield recipient without taking assets out,
/// increasing the backing ratio for everyone else.
pub fn burn_collected_yield(ctx: Context<BurnCollectedYield>, shares: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accs = &mut *ctx.accounts;

    require!(shares > 0, VaultError::ZeroShares);

    accs.vault.begin_mutating()?;

    let burn_ctx = CpiContext::new(
        accs.token_program.to_account_info(),
        Burn {
            mint: accs.claim_mint.to_account_info(),
            from: accs.recipient_claim.to_account_info(),
            authority: accs.recipient.to_account_info(),
        },
    );
    token::burn(burn_ctx, shares)?;

    accs.vault.record_returned_yield(shares)?;
    accs.vault.end_mutating();

    emit!(CollectedYieldReturned {
        vault: accs.vault.key(),
        recipient: accs.recipient.key(),
        shares_burned: shares,
        net_collected_yield: accs.vault.net_collected_yield,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Returned {} yield, net collected now {}",
        shares,
        accs.vault.net_collected_yield
    );

    Ok(())
}
