//! Interface to the external yield facility.
//!
//! The facility is an ERC4626-style vault program referenced by address.
//! Only the state prefix needed for capacity and pricing reads is declared
//! here; writes go through manually built instructions. Solana CPI failures
//! cannot be caught by the caller, so every facility call is pre-checked
//! against `max_deposit`/`max_withdraw` before invoking and undepositable
//! remainders fall back to the reserve.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;

use crate::errors::VaultError;
use crate::transport::sighash;

/// Declared prefix of the facility's state account. The facility may append
/// fields; deserialization reads only this much.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct YieldVaultState {
    pub total_assets: u64,
    pub total_shares: u64,
    pub deposit_limit: u64,
    pub available_liquidity: u64,
    pub paused: bool,
}

impl YieldVaultState {
    /// Read and validate the facility state account.
    pub fn load(
        info: &AccountInfo,
        expected_key: &Pubkey,
        expected_program: &Pubkey,
    ) -> Result<Self> {
        require_keys_eq!(*info.key, *expected_key, VaultError::InvalidYieldVaultAccount);
        require_keys_eq!(
            *info.owner,
            *expected_program,
            VaultError::InvalidYieldVaultAccount
        );
        let data = info.try_borrow_data()?;
        require!(data.len() > 8, VaultError::InvalidYieldVaultAccount);
        let mut slice: &[u8] = &data[8..];
        Self::deserialize(&mut slice).map_err(|_| error!(VaultError::InvalidYieldVaultAccount))
    }

    /// Facility share value in asset terms (virtual-offset pricing, so an
    /// empty facility prices 1:1 and division never hits zero).
    pub fn convert_to_assets(&self, shares: u64) -> Result<u64> {
        let assets = (shares as u128)
            .checked_mul(self.total_assets as u128 + 1)
            .ok_or(VaultError::MathOverflow)?
            / (self.total_shares as u128 + 1);
        u64::try_from(assets).map_err(|_| error!(VaultError::MathOverflow))
    }

    pub fn convert_to_shares(&self, assets: u64) -> Result<u64> {
        let shares = (assets as u128)
            .checked_mul(self.total_shares as u128 + 1)
            .ok_or(VaultError::MathOverflow)?
            / (self.total_assets as u128 + 1);
        u64::try_from(shares).map_err(|_| error!(VaultError::MathOverflow))
    }

    pub fn max_deposit(&self) -> u64 {
        if self.paused {
            return 0;
        }
        self.deposit_limit.saturating_sub(self.total_assets)
    }

    pub fn max_withdraw(&self) -> u64 {
        if self.paused {
            return 0;
        }
        self.available_liquidity
    }
}

/// Accounts for facility deposit/withdraw/redeem CPIs. `caller_assets` is
/// the vault's reserve account, `caller_shares` its facility share account,
/// `authority` the vault signer PDA.
pub struct FacilityCpi<'a, 'info> {
    pub program: &'a AccountInfo<'info>,
    pub state: &'a AccountInfo<'info>,
    pub custody: &'a AccountInfo<'info>,
    pub share_mint: &'a AccountInfo<'info>,
    pub caller_assets: &'a AccountInfo<'info>,
    pub caller_shares: &'a AccountInfo<'info>,
    pub authority: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
}

impl FacilityCpi<'_, '_> {
    fn invoke(&self, discriminator: [u8; 8], amount: u64, signer_seeds: &[&[&[u8]]]) -> Result<()> {
        let mut data = discriminator.to_vec();
        amount.serialize(&mut data)?;

        let ix = Instruction {
            program_id: *self.program.key,
            accounts: vec![
                AccountMeta::new(*self.state.key, false),
                AccountMeta::new(*self.custody.key, false),
                AccountMeta::new(*self.share_mint.key, false),
                AccountMeta::new(*self.caller_assets.key, false),
                AccountMeta::new(*self.caller_shares.key, false),
                AccountMeta::new_readonly(*self.authority.key, true),
                AccountMeta::new_readonly(*self.token_program.key, false),
            ],
            data,
        };
        invoke_signed(
            &ix,
            &[
                self.state.clone(),
                self.custody.clone(),
                self.share_mint.clone(),
                self.caller_assets.clone(),
                self.caller_shares.clone(),
                self.authority.clone(),
                self.token_program.clone(),
            ],
            signer_seeds,
        )
        .map_err(Into::into)
    }

    pub fn deposit(&self, assets: u64, signer_seeds: &[&[&[u8]]]) -> Result<()> {
        self.invoke(sighash::DEPOSIT, assets, signer_seeds)
    }

    pub fn withdraw(&self, assets: u64, signer_seeds: &[&[&[u8]]]) -> Result<()> {
        self.invoke(sighash::WITHDRAW, assets, signer_seeds)
    }

    pub fn redeem(&self, shares: u64, signer_seeds: &[&[&[u8]]]) -> Result<()> {
        self.invoke(sighash::REDEEM, shares, signer_seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_state() -> YieldVaultState {
        YieldVaultState {
            total_assets: 1_000_000_000,
            total_shares: 800_000_000,
            deposit_limit: 2_000_000_000,
            available_liquidity: 300_000_000,
            paused: false,
        }
    }

    #[test]
    fn empty_facility_prices_one_to_one() {
        let state = YieldVaultState::default();
        assert_eq!(state.convert_to_assets(1_000).unwrap(), 1_000);
        assert_eq!(state.convert_to_shares(1_000).unwrap(), 1_000);
    }

    #[test]
    fn conversions_follow_facility_ratio() {
        let state = make_state();
        // 1 share ~ 1.25 assets
        let assets = state.convert_to_assets(800_000_000).unwrap();
        assert!(assets >= 999_999_998 && assets <= 1_000_000_001);

        let shares = state.convert_to_shares(1_000_000_000).unwrap();
        assert!(shares >= 799_999_998 && shares <= 800_000_001);
    }

    #[test]
    fn paused_facility_has_no_capacity() {
        let mut state = make_state();
        state.paused = true;
        assert_eq!(state.max_deposit(), 0);
        assert_eq!(state.max_withdraw(), 0);
    }

    #[test]
    fn capacity_is_limit_minus_holdings() {
        let state = make_state();
        assert_eq!(state.max_deposit(), 1_000_000_000);
        assert_eq!(state.max_withdraw(), 300_000_000);

        let mut full = state;
        full.total_assets = full.deposit_limit;
        assert_eq!(full.max_deposit(), 0);
    }
}
