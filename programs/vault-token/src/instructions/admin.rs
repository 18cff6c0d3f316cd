//! Admin operations: pause, configuration, converter bindings, and yield
//! facility rotation.

use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};

use crate::constants::{CONVERTER_BINDING_SEED, PERCENTAGE_DENOMINATOR, VAULT_SEED, ZERO_ADDRESS};
use crate::errors::VaultError;
use crate::events::{
    ConverterConfigured, MinimumReservePercentageUpdated, Paused, Unpaused,
    YieldRecipientUpdated, YieldVaultUpdated,
};
use crate::state::{ConverterBinding, VaultState};
use crate::yield_vault::{FacilityCpi, YieldVaultState};

#[derive(Accounts)]
pub struct AdminOnly<'info> {
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
}

pub fn pause(ctx: Context<AdminOnly>) -> Result<()> {
    let clock = Clock::get()?;
    let vault = &mut ctx.accounts.vault;
    vault.paused = true;

    emit!(Paused {
        vault: vault.key(),
        admin: ctx.accounts.admin.key(),
        timestamp: clock.unix_timestamp,
    });
    msg!("Vault paused");
    Ok(())
}

pub fn unpause(ctx: Context<AdminOnly>) -> Result<()> {
    let clock = Clock::get()?;
    let vault = &mut ctx.accounts.vault;
    vault.paused = false;

    emit!(Unpaused {
        vault: vault.key(),
        admin: ctx.accounts.admin.key(),
        timestamp: clock.unix_timestamp,
    });
    msg!("Vault unpaused");
    Ok(())
}

pub fn set_yield_recipient(ctx: Context<AdminOnly>, new_recipient: Pubkey) -> Result<()> {
    let clock = Clock::get()?;
    require!(new_recipient != Pubkey::default(), VaultError::InvalidAddress);

    let vault = &mut ctx.accounts.vault;
    let old = vault.yield_recipient;
    vault.yield_recipient = new_recipient;

    emit!(YieldRecipientUpdated {
        vault: vault.key(),
        old_recipient: old,
        new_recipient,
        timestamp: clock.unix_timestamp,
    });
    msg!("Yield recipient {} -> {}", old, new_recipient);
    Ok(())
}

/// Raising the percentage takes effect lazily; the reserve catches up on the
/// next deposit or rebalance rather than forcing an immediate facility pull.
pub fn set_minimum_reserve_percentage(ctx: Context<AdminOnly>, new_percentage: u8) -> Result<()> {
    let clock = Clock::get()?;
    require!(
        (new_percentage as u64) <= PERCENTAGE_DENOMINATOR,
        VaultError::InvalidPercentage
    );

    let vault = &mut ctx.accounts.vault;
    let old = vault.minimum_reserve_percentage;
    vault.minimum_reserve_percentage = new_percentage;

    emit!(MinimumReservePercentageUpdated {
        vault: vault.key(),
        old_percentage: old,
        new_percentage,
        timestamp: clock.unix_timestamp,
    });
    msg!("Minimum reserve percentage {}% -> {}%", old, new_percentage);
    Ok(())
}

// =============================================================================
// CONVERTER BINDING
// =============================================================================

#[derive(Accounts)]
#[instruction(origin_ledger_id: u32)]
pub struct SetNativeConverter<'info> {
    #[account(
        mut,
        constraint = admin.key() == vault.admin @ VaultError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Box<Account<'info, VaultState>>,

    #[account(
        init_if_needed,
        payer = admin,
        space = ConverterBinding::LEN,
        seeds = [CONVERTER_BINDING_SEED, vault.key().as_ref(), &origin_ledger_id.to_le_bytes()],
        bump,
    )]
    pub converter_binding: Box<Account<'info, ConverterBinding>>,

    pub system_program: Program<'info, System>,
}

/// Bind (or clear, with the zero address) the converter trusted to mint via
/// direct messages from `origin_ledger_id`.
pub fn set_native_converter(
    ctx: Context<SetNativeConverter>,
    origin_ledger_id: u32,
    converter: [u8; 32],
) -> Result<()> {
    let clock = Clock::get()?;
    require!(
        origin_ledger_id != ctx.accounts.vault.ledger_id,
        VaultError::InvalidLedgerId
    );

    let binding = &mut ctx.accounts.converter_binding;
    binding.bump = ctx.bumps.converter_binding;
    binding.vault = ctx.accounts.vault.key();
    binding.origin_ledger_id = origin_ledger_id;
    binding.converter = converter;
    binding.enabled = converter != ZERO_ADDRESS;

    emit!(ConverterConfigured {
        vault: ctx.accounts.vault.key(),
        origin_ledger_id,
        converter,
        enabled: binding.enabled,
        timestamp: clock.unix_timestamp,
    });
    msg!(
        "Converter for ledger {} {}",
        origin_ledger_id,
        if binding.enabled { "bound" } else { "cleared" }
    );
    Ok(())
}

// =============================================================================
// YIELD FACILITY ROTATION
// =============================================================================

#[derive(Accounts)]
pub struct SetYieldVault<'info> {
    #[account(
        constraint = admin.key() == vault.admin @ VaultError::Unauthorized,
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
        constraint = vault.paused @ VaultError::VaultNotPaused,
    )]
    pub vault: Box<Account<'info, VaultState>>,

    #[account(mut, address = vault.reserve_account)]
    pub reserve_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: current facility program
    #[account(address = vault.yield_vault_program)]
    pub old_yield_vault_program: UncheckedAccount<'info>,

    /// CHECK: current facility state
    #[account(mut)]
    pub old_yield_vault_state: UncheckedAccount<'info>,

    /// CHECK: current facility underlying custody
    #[account(mut)]
    pub old_yield_vault_custody: UncheckedAccount<'info>,

    /// CHECK: current facility share mint
    #[account(mut)]
    pub old_yield_share_mint: UncheckedAccount<'info>,

    #[account(mut, address = vault.yield_share_account)]
    pub old_yield_share_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: replacement facility program
    pub new_yield_vault_program: UncheckedAccount<'info>,

    /// CHECK: replacement facility state, validated in the handler
    pub new_yield_vault_state: UncheckedAccount<'info>,

    /// Vault's share account for the replacement facility
    #[account(
        constraint = new_yield_share_account.owner == vault.key() @ VaultError::InvalidYieldVaultAccount,
    )]
    pub new_yield_share_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_2022_program: Interface<'info, TokenInterface>,
}

/// Rotate to a new yield facility. Requires the vault paused; the old
/// position is fully redeemed into reserve first, with the measured proceeds
/// checked against the old facility's own pricing.
pub fn set_yield_vault(ctx: Context<SetYieldVault>) -> Result<()> {
    let clock = Clock::get()?;
    let program_id = ctx.program_id;
    let accs = &mut *ctx.accounts;

    accs.vault.begin_mutating()?;
    accs.vault.exit(program_id)?;

    // New facility must be live before we commit to it.
    YieldVaultState::load(
        &accs.new_yield_vault_state,
        accs.new_yield_vault_state.key,
        accs.new_yield_vault_program.key,
    )?;

    let underlying_key = accs.vault.underlying_mint;
    let bump = accs.vault.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, underlying_key.as_ref(), &[bump]]];

    let mut drained = 0u64;
    let shares_held = accs.old_yield_share_account.amount;
    if shares_held > 0 {
        let old_state = YieldVaultState::load(
            &accs.old_yield_vault_state,
            &accs.vault.yield_vault,
            &accs.vault.yield_vault_program,
        )?;
        let expected = old_state.convert_to_assets(shares_held)?;

        let facility_program = accs.old_yield_vault_program.to_account_info();
        let facility_state = accs.old_yield_vault_state.to_account_info();
        let facility_custody = accs.old_yield_vault_custody.to_account_info();
        let facility_share_mint = accs.old_yield_share_mint.to_account_info();
        let caller_assets = accs.reserve_account.to_account_info();
        let caller_shares = accs.old_yield_share_account.to_account_info();
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

        let reserve_before = accs.reserve_account.amount;
        facility.redeem(shares_held, signer_seeds)?;
        accs.reserve_account.reload()?;
        accs.old_yield_share_account.reload()?;

        require!(
            accs.old_yield_share_account.amount == 0,
            VaultError::ExcessiveYieldVaultSharesBurned
        );
        drained = accs
            .reserve_account
            .amount
            .checked_sub(reserve_before)
            .ok_or(VaultError::MathOverflow)?;

        // Shortfall beyond the slippage tolerance means the old facility is
        // not returning what its pricing claims; abort rather than book a loss.
        let tolerance = (expected as u128)
            .checked_mul(accs.vault.max_slippage_bps as u128)
            .ok_or(VaultError::MathOverflow)?
            / (crate::constants::BPS_DENOMINATOR as u128);
        if (drained as u128) + tolerance < expected as u128 {
            msg!("drained {} of {} expected from old yield vault", drained, expected);
            return Err(error!(VaultError::InsufficientAssetsReceived));
        }

        accs.vault.reserved_assets = accs
            .vault
            .reserved_assets
            .checked_add(drained)
            .ok_or(VaultError::MathOverflow)?;
    }

    let old_facility = accs.vault.yield_vault;
    accs.vault.yield_vault_program = accs.new_yield_vault_program.key();
    accs.vault.yield_vault = accs.new_yield_vault_state.key();
    accs.vault.yield_share_account = accs.new_yield_share_account.key();
    accs.vault.end_mutating();

    emit!(YieldVaultUpdated {
        vault: accs.vault.key(),
        old_yield_vault: old_facility,
        new_yield_vault: accs.vault.yield_vault,
        drained_assets: drained,
        timestamp: clock.unix_timestamp,
    });
    msg!(
        "Rotated yield vault {} -> {}, drained {}",
        old_facility,
        accs.vault.yield_vault,
        drained
    );
    Ok(())
}
