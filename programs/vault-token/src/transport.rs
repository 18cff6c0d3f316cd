//! Outbound interface to the cross-ledger transport program.
//!
//! The transport is an external program referenced by address. It locks
//! bridged assets and carries opaque message payloads; each leg is claimable
//! exactly once on the destination ledger. Instructions are built manually
//! with anchor `global:` sighash discriminators, the convention for calling
//! a foreign Anchor program without a compile-time dependency.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::{invoke, invoke_signed};

/// 8-byte anchor instruction discriminators, sha256("global:<name>")[..8].
/// Precomputed; the test module pins each one against a live hash.
pub(crate) mod sighash {
    pub const BRIDGE_ASSET: [u8; 8] = [0xef, 0xc9, 0x7f, 0xb6, 0xa3, 0x23, 0x68, 0xa9];
    pub const BRIDGE_MESSAGE: [u8; 8] = [0x24, 0x18, 0x06, 0x22, 0x94, 0x8f, 0xd2, 0xd1];
    pub const CLAIM_ASSET: [u8; 8] = [0x77, 0xdd, 0x85, 0x25, 0x58, 0x23, 0xb9, 0x0c];
    pub const DEPOSIT: [u8; 8] = [0xf2, 0x23, 0xc6, 0x89, 0x52, 0xe1, 0xf2, 0xb6];
    pub const WITHDRAW: [u8; 8] = [0xb7, 0x12, 0x46, 0x9c, 0x94, 0x6d, 0xa1, 0x22];
    pub const REDEEM: [u8; 8] = [0xb8, 0x0c, 0x56, 0x95, 0x46, 0xc4, 0x61, 0xe1];
}

#[derive(AnchorSerialize)]
struct BridgeAssetArgs {
    destination_ledger_id: u32,
    destination_address: [u8; 32],
    amount: u64,
    force_update: bool,
}

#[derive(AnchorSerialize)]
struct BridgeMessageArgs {
    destination_ledger_id: u32,
    destination_address: [u8; 32],
    force_update: bool,
    payload: Vec<u8>,
}

/// Accounts for locking tokens into the transport's custody.
pub struct TransportAssetCpi<'a, 'info> {
    pub program: &'a AccountInfo<'info>,
    pub config: &'a AccountInfo<'info>,
    pub custody: &'a AccountInfo<'info>,
    pub from: &'a AccountInfo<'info>,
    pub authority: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
}

impl TransportAssetCpi<'_, '_> {
    pub fn bridge_asset(
        &self,
        destination_ledger_id: u32,
        destination_address: [u8; 32],
        amount: u64,
        force_update: bool,
        signer_seeds: &[&[&[u8]]],
    ) -> Result<()> {
        let mut data = sighash::BRIDGE_ASSET.to_vec();
        BridgeAssetArgs {
            destination_ledger_id,
            destination_address,
            amount,
            force_update,
        }
        .serialize(&mut data)?;

        let ix = Instruction {
            program_id: *self.program.key,
            accounts: vec![
                AccountMeta::new(*self.config.key, false),
                AccountMeta::new(*self.custody.key, false),
                AccountMeta::new(*self.from.key, false),
                AccountMeta::new_readonly(*self.authority.key, true),
                AccountMeta::new_readonly(*self.token_program.key, false),
            ],
            data,
        };
        invoke_signed(
            &ix,
            &[
                self.config.clone(),
                self.custody.clone(),
                self.from.clone(),
                self.authority.clone(),
                self.token_program.clone(),
            ],
            signer_seeds,
        )
        .map_err(Into::into)
    }
}

/// Accounts for sending a message leg.
pub struct TransportMessageCpi<'a, 'info> {
    pub program: &'a AccountInfo<'info>,
    pub config: &'a AccountInfo<'info>,
    pub authority: &'a AccountInfo<'info>,
}

impl TransportMessageCpi<'_, '_> {
    pub fn bridge_message(
        &self,
        destination_ledger_id: u32,
        destination_address: [u8; 32],
        force_update: bool,
        payload: Vec<u8>,
        signer_seeds: &[&[&[u8]]],
    ) -> Result<()> {
        let mut data = sighash::BRIDGE_MESSAGE.to_vec();
        BridgeMessageArgs {
            destination_ledger_id,
            destination_address,
            force_update,
            payload,
        }
        .serialize(&mut data)?;

        let ix = Instruction {
            program_id: *self.program.key,
            accounts: vec![
                AccountMeta::new(*self.config.key, false),
                AccountMeta::new_readonly(*self.authority.key, true),
            ],
            data,
        };
        invoke_signed(
            &ix,
            &[self.config.clone(), self.authority.clone()],
            signer_seeds,
        )
        .map_err(Into::into)
    }
}

/// Accounts for claiming an inbound asset leg by proof.
pub struct TransportClaimCpi<'a, 'info> {
    pub program: &'a AccountInfo<'info>,
    pub config: &'a AccountInfo<'info>,
    pub destination: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
}

impl TransportClaimCpi<'_, '_> {
    /// `claim_data` is the transport's opaque proof blob, forwarded verbatim.
    pub fn claim_asset(&self, claim_data: Vec<u8>) -> Result<()> {
        let mut data = sighash::CLAIM_ASSET.to_vec();
        claim_data.serialize(&mut data)?;

        let ix = Instruction {
            program_id: *self.program.key,
            accounts: vec![
                AccountMeta::new(*self.config.key, false),
                AccountMeta::new(*self.destination.key, false),
                AccountMeta::new_readonly(*self.token_program.key, false),
            ],
            data,
        };
        invoke(
            &ix,
            &[
                self.config.clone(),
                self.destination.clone(),
                self.token_program.clone(),
            ],
        )
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::sighash;
    use sha2::{Digest, Sha256};

    fn anchor_sighash(name: &str) -> [u8; 8] {
        let digest = Sha256::digest(format!("global:{name}").as_bytes());
        let mut out = [0u8; 8];
        out.copy_from_slice(&digest[..8]);
        out
    }

    #[test]
    fn discriminators_match_the_anchor_convention() {
        assert_eq!(sighash::BRIDGE_ASSET, anchor_sighash("bridge_asset"));
        assert_eq!(sighash::BRIDGE_MESSAGE, anchor_sighash("bridge_message"));
        assert_eq!(sighash::CLAIM_ASSET, anchor_sighash("claim_asset"));
        assert_eq!(sighash::DEPOSIT, anchor_sighash("deposit"));
        assert_eq!(sighash::WITHDRAW, anchor_sighash("withdraw"));
        assert_eq!(sighash::REDEEM, anchor_sighash("redeem"));
    }
}
