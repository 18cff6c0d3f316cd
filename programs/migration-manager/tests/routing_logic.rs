//! Unit-level tests for manager routing state.

use anchor_lang::prelude::Pubkey;
use migration_manager::{FundingSource, TokenPair};
use vault_token::CrossLedgerInstruction;

fn make_pair() -> TokenPair {
    TokenPair {
        bump: 255,
        escrow_bump: 254,
        manager: Pubkey::new_unique(),
        origin_ledger_id: 7,
        converter: [0xAA; 32],
        vault: Pubkey::new_unique(),
        underlying_mint: Pubkey::new_unique(),
        escrow: Pubkey::new_unique(),
        funding_source: FundingSource::TokenPull,
        enabled: true,
    }
}

#[test]
fn test_pair_authorizes_only_its_converter() {
    let pair = make_pair();
    assert!(pair.authorizes(&[0xAA; 32]));
    assert!(!pair.authorizes(&[0xAB; 32]));
    assert!(!pair.authorizes(&[0u8; 32]));
}

#[test]
fn test_disabled_pair_rejects_everything() {
    let mut pair = make_pair();
    pair.enabled = false;
    assert!(!pair.authorizes(&[0xAA; 32]));
}

#[test]
fn test_routed_payloads_decode_with_vault_codec() {
    // The manager and the vault must agree on the wire format; both sides
    // use the shared codec.
    let bytes = CrossLedgerInstruction::CompleteMigration {
        shares: 42,
        assets: 43,
    }
    .encode()
    .unwrap();

    match CrossLedgerInstruction::decode(&bytes).unwrap() {
        CrossLedgerInstruction::CompleteMigration { shares, assets } => {
            assert_eq!(shares, 42);
            assert_eq!(assets, 43);
        }
        other => panic!("unexpected decode: {:?}", other),
    }
}
