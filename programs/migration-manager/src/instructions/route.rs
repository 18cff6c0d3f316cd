//! Inbound message routing.
//!
//! The transport delivers a converter's migration message here; the manager
//! authenticates the (origin ledger, sender) tuple against its configured
//! pairs, readies the asset leg in the pair escrow, and hands settlement to
//! the vault via CPI. The vault re-checks everything it cares about; the
//! manager's job is routing and funding, not accounting.

use anchor_lang::prelude::*;
use anchor_spl::{
    token::Token,
    token_2022::{self, SyncNative},
    token_interface::{TokenAccount, TokenInterface},
};

use vault_token::message::CrossLedgerInstruction;

use crate::constants::{MANAGER_SEED, TOKEN_PAIR_SEED};
use crate::errors::ManagerError;
use crate::events::{CustomMessageReceived, MigrationRouted};
use crate::state::{FundingSource, ManagerState, TokenPair};

#[derive(Accounts)]
#[instruction(origin_ledger_id: u32, origin_address: [u8; 32])]
pub struct OnMessageReceived<'info> {
    /// Transport endpoint authority, proving the message came through the
    /// transport
    #[account(
        constraint = transport_authority.key() == manager.transport_authority @ ManagerError::Unauthorized,
    )]
    pub transport_authority: Signer<'info>,

    #[account(
        seeds = [MANAGER_SEED],
        bump = manager.bump,
        constraint = !manager.paused @ ManagerError::ManagerPaused,
    )]
    pub manager: Box<Account<'info, ManagerState>>,

    /// Routing entry for the claimed (origin ledger, sender) tuple
    #[account(
        seeds = [
            TOKEN_PAIR_SEED,
            manager.key().as_ref(),
            &origin_ledger_id.to_le_bytes(),
            origin_address.as_ref(),
        ],
        bump = token_pair.bump,
        constraint = token_pair.authorizes(&origin_address) @ ManagerError::UnknownTokenPair,
    )]
    pub token_pair: Box<Account<'info, TokenPair>>,

    #[account(mut, address = token_pair.escrow)]
    pub escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    // Everything below is passed through to the vault, which validates each
    // account against its own state.
    pub vault_program: Program<'info, vault_token::program::VaultToken>,

    /// CHECK: validated by the vault program
    #[account(mut, address = token_pair.vault)]
    pub vault: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    pub underlying_mint: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    #[account(mut)]
    pub claim_mint: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    #[account(mut)]
    pub claim_escrow: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    #[account(mut)]
    pub reserve_account: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    pub yield_vault_program: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    #[account(mut)]
    pub yield_vault_state: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    #[account(mut)]
    pub yield_vault_custody: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    #[account(mut)]
    pub yield_share_mint: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    #[account(mut)]
    pub yield_share_account: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    pub transport_program: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    #[account(mut)]
    pub transport_config: UncheckedAccount<'info>,

    /// CHECK: validated by the vault program
    #[account(mut)]
    pub transport_custody: UncheckedAccount<'info>,

    pub token_2022_program: Interface<'info, TokenInterface>,
    pub token_program: Program<'info, Token>,
}

pub fn handler(
    ctx: Context<OnMessageReceived>,
    origin_ledger_id: u32,
    origin_address: [u8; 32],
    payload: Vec<u8>,
) -> Result<()> {
    let clock = Clock::get()?;
    let accs = &mut *ctx.accounts;

    require!(
        origin_ledger_id != accs.manager.ledger_id,
        ManagerError::InvalidLedgerId
    );

    let instruction = CrossLedgerInstruction::decode(&payload)
        .map_err(|_| error!(ManagerError::InvalidInstructionPayload))?;
    let (shares, assets) = match instruction {
        CrossLedgerInstruction::CompleteMigration { shares, assets } => (shares, assets),
        CrossLedgerInstruction::Custom { payload } => {
            emit!(CustomMessageReceived {
                manager: accs.manager.key(),
                origin_ledger_id,
                origin_address,
                payload_len: payload.len() as u32,
                timestamp: clock.unix_timestamp,
            });
            return Ok(());
        }
    };
    require!(shares > 0, ManagerError::ZeroShares);

    let bump = accs.manager.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[MANAGER_SEED, &[bump]]];

    // A wrapped-native leg arrives as raw lamports on the escrow account;
    // fold them into the token balance before the vault measures anything.
    if accs.token_pair.funding_source == FundingSource::WrappedNative {
        let sync_ctx = CpiContext::new(
            accs.token_2022_program.to_account_info(),
            SyncNative {
                account: accs.escrow.to_account_info(),
            },
        );
        token_2022::sync_native(sync_ctx)?;
        accs.escrow.reload()?;
    }

    let escrow_before = accs.escrow.amount;

    let cpi_accounts = vault_token::cpi::accounts::CompleteMigration {
        authority: accs.manager.to_account_info(),
        vault: accs.vault.to_account_info(),
        underlying_mint: accs.underlying_mint.to_account_info(),
        claim_mint: accs.claim_mint.to_account_info(),
        claim_escrow: accs.claim_escrow.to_account_info(),
        funding_assets: accs.escrow.to_account_info(),
        reserve_account: accs.reserve_account.to_account_info(),
        yield_vault_program: accs.yield_vault_program.to_account_info(),
        yield_vault_state: accs.yield_vault_state.to_account_info(),
        yield_vault_custody: accs.yield_vault_custody.to_account_info(),
        yield_share_mint: accs.yield_share_mint.to_account_info(),
        yield_share_account: accs.yield_share_account.to_account_info(),
        transport_program: accs.transport_program.to_account_info(),
        transport_config: accs.transport_config.to_account_info(),
        transport_custody: accs.transport_custody.to_account_info(),
        token_2022_program: accs.token_2022_program.to_account_info(),
        token_program: accs.token_program.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        accs.vault_program.to_account_info(),
        cpi_accounts,
        signer_seeds,
    );
    vault_token::cpi::complete_migration(cpi_ctx, origin_ledger_id, shares, assets)?;

    accs.escrow.reload()?;
    let funded = escrow_before
        .checked_sub(accs.escrow.amount)
        .ok_or(ManagerError::MathOverflow)?;

    emit!(MigrationRouted {
        manager: accs.manager.key(),
        origin_ledger_id,
        converter: origin_address,
        vault: accs.token_pair.vault,
        shares,
        assets,
        funded,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Routed migration from ledger {}: {} shares to vault {}, funded {}",
        origin_ledger_id,
        shares,
        accs.token_pair.vault,
        funded
    );
    Ok(())
}
