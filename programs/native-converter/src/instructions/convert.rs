//! Local 1:1 issuance against backing held by the converter.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Burn, MintTo, Token},
    token_interface::{Mint as MintInterface, TokenAccount, TokenInterface, TransferChecked},
};

use crate::constants::CONVERTER_STATE_SEED;
use crate::errors::ConverterError;
use crate::events::{Converted, Deconverted};
use crate::state::ConverterState;

#[derive(Accounts)]
pub struct Convert<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    /// CHECK: receiver of the minted local tokens
    pub receiver: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [CONVERTER_STATE_SEED, converter.underlying_mint.as_ref()],
        bump = converter.bump,
        constraint = !converter.paused @ ConverterError::ConverterPaused,
    )]
    pub converter: Box<Account<'info, ConverterState>>,

    #[account(address = converter.underlying_mint)]
    pub underlying_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(mut, address = converter.local_mint)]
    pub local_mint: Box<Account<'info, anchor_spl::token::Mint>>,

    #[account(
        mut,
        constraint = depositor_assets.owner == depositor.key() @ ConverterError::Unauthorized,
        constraint = depositor_assets.mint == converter.underlying_mint @ ConverterError::InvalidMint,
    )]
    pub depositor_assets: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = converter.backing_account)]
    pub backing_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receiver's local token account (created if needed)
    #[account(
        init_if_needed,
        payer = depositor,
        associated_token::mint = local_mint,
        associated_token::authority = receiver,
    )]
    pub receiver_local: Box<Account<'info, anchor_spl::token::TokenAccount>>,

    pub token_2022_program: Interface<'info, TokenInterface>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

/// Lock backing, mint the measured post-fee amount of local tokens.
pub fn convert(ctx: Context<Convert>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accs = &mut *ctx.accounts;

    require!(amount > 0, ConverterError::InvalidAmount);

    let balance_before = accs.backing_account.amount;
    let transfer_ctx = CpiContext::new(
        accs.token_2022_program.to_account_info(),
        TransferChecked {
            from: accs.depositor_assets.to_account_info(),
            mint: accs.underlying_mint.to_account_info(),
            to: accs.backing_account.to_account_info(),
            authority: accs.depositor.to_account_info(),
        },
    );
    anchor_spl::token_interface::transfer_checked(
        transfer_ctx,
        amount,
        accs.underlying_mint.decimals,
    )?;
    accs.backing_account.reload()?;
    let received = accs
        .backing_account
        .amount
        .checked_sub(balance_before)
        .ok_or(ConverterError::MathOverflow)?;
    require!(received > 0, ConverterError::InvalidAmount);

    let underlying_key = accs.converter.underlying_mint;
    let bump = accs.converter.bump;
    let signer_seeds: &[&[&[u8]]] =
        &[&[CONVERTER_STATE_SEED, underlying_key.as_ref(), &[bump]]];

    let mint_ctx = CpiContext::new_with_signer(
        accs.token_program.to_account_info(),
        MintTo {
            mint: accs.local_mint.to_account_info(),
            to: accs.receiver_local.to_account_info(),
            authority: accs.converter.to_account_info(),
        },
        signer_seeds,
    );
    token::mint_to(mint_ctx, received)?;

    accs.converter.record_convert(received)?;

    emit!(Converted {
        converter: accs.converter.key(),
        depositor: accs.depositor.key(),
        receiver: accs.receiver.key(),
        assets_received: received,
        tokens_minted: received,
        timestamp: clock.unix_timestamp,
    });

    msg!("Converted {} (requested {})", received, amount);
    Ok(())
}

#[derive(Accounts)]
pub struct Deconvert<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONVERTER_STATE_SEED, converter.underlying_mint.as_ref()],
        bump = converter.bump,
        constraint = !converter.paused @ ConverterError::ConverterPaused,
    )]
    pub converter: Box<Account<'info, ConverterState>>,

    #[account(address = converter.underlying_mint)]
    pub underlying_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(mut, address = converter.local_mint)]
    pub local_mint: Box<Account<'info, anchor_spl::token::Mint>>,

    #[account(
        mut,
        constraint = owner_local.owner == owner.key() @ ConverterError::Unauthorized,
        constraint = owner_local.mint == converter.local_mint @ ConverterError::InvalidMint,
    )]
    pub owner_local: Box<Account<'info, anchor_spl::token::TokenAccount>>,

    #[account(mut, address = converter.backing_account)]
    pub backing_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = receiver_assets.mint == converter.underlying_mint @ ConverterError::InvalidMint,
    )]
    pub receiver_assets: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_2022_program: Interface<'info, TokenInterface>,
    pub token_program: Program<'info, Token>,
}

/// Burn local tokens, release the same amount of backing. Bounded by what is
/// still here: backing that already migrated can only be redeemed on the
/// main ledger.
pub fn deconvert(ctx: Context<Deconvert>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accs = &mut *ctx.accounts;

    require!(amount > 0, ConverterError::InvalidAmount);
    if accs.backing_account.amount < amount {
        msg!(
            "backing holds {}, {} requested",
            accs.backing_account.amount,
            amount
        );
        return Err(error!(ConverterError::InsufficientBacking));
    }

    let burn_ctx = CpiContext::new(
        accs.token_program.to_account_info(),
        Burn {
            mint: accs.local_mint.to_account_info(),
            from: accs.owner_local.to_account_info(),
            authority: accs.owner.to_account_info(),
        },
    );
    token::burn(burn_ctx, amount)?;

    let underlying_key = accs.converter.underlying_mint;
    let bump = accs.converter.bump;
    let signer_seeds: &[&[&[u8]]] =
        &[&[CONVERTER_STATE_SEED, underlying_key.as_ref(), &[bump]]];

    let transfer_ctx = CpiContext::new_with_signer(
        accs.token_2022_program.to_account_info(),
        TransferChecked {
            from: accs.backing_account.to_account_info(),
            mint: accs.underlying_mint.to_account_info(),
            to: accs.receiver_assets.to_account_info(),
            authority: accs.converter.to_account_info(),
        },
        signer_seeds,
    );
    anchor_spl::token_interface::transfer_checked(
        transfer_ctx,
        amount,
        accs.underlying_mint.decimals,
    )?;

    accs.converter.record_deconvert(amount)?;

    emit!(Deconverted {
        converter: accs.converter.key(),
        owner: accs.owner.key(),
        receiver: accs.receiver_assets.key(),
        tokens_burned: amount,
        assets_paid: amount,
        timestamp: clock.unix_timestamp,
    });

    msg!("Deconverted {}", amount);
    Ok(())
}
