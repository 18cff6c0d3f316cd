//! Cross-ledger instruction payloads.
//!
//! The transport carries an opaque byte payload next to (but independently
//! of) any asset leg. Both legs are claimable exactly once, by any party, in
//! either order; the payload is interpreted only by the named recipient after
//! the sender has been authenticated.

use anchor_lang::prelude::*;

use crate::errors::VaultError;

/// Tagged union carried in the transport's generic message payload.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum CrossLedgerInstruction {
    /// Reconcile migrated backing into new claim-token supply.
    /// `shares` is the exact local-representation amount whose backing
    /// migrates; `assets` is the pre-fee amount sent with the asset leg.
    CompleteMigration { shares: u64, assets: u64 },
    /// Application-defined payload, ignored by the core.
    Custom { payload: Vec<u8> },
}

impl CrossLedgerInstruction {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(17);
        self.serialize(&mut buf)
            .map_err(|_| error!(VaultError::InvalidInstructionPayload))?;
        Ok(buf)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut slice = data;
        let decoded = Self::deserialize(&mut slice)
            .map_err(|_| error!(VaultError::InvalidInstructionPayload))?;
        // Trailing bytes mean the payload was not produced by a converter.
        require!(slice.is_empty(), VaultError::InvalidInstructionPayload);
        Ok(decoded)
    }
}
