//! Unit-level tests for migration reconciliation and the cross-ledger
//! instruction codec.

use anchor_lang::prelude::Pubkey;
use vault_token::{ConverterBinding, CrossLedgerInstruction, VaultError, VaultState};

// =========================================================================
// HELPERS
// =========================================================================

fn make_vault() -> VaultState {
    VaultState {
        bump: 255,
        version: 1,
        admin: Pubkey::new_unique(),
        underlying_mint: Pubkey::new_unique(),
        underlying_decimals: 6,
        claim_mint: Pubkey::new_unique(),
        reserve_account: Pubkey::new_unique(),
        claim_escrow: Pubkey::new_unique(),
        migration_inbox: Pubkey::new_unique(),
        yield_vault_program: Pubkey::new_unique(),
        yield_vault: Pubkey::new_unique(),
        yield_share_account: Pubkey::new_unique(),
        yield_recipient: Pubkey::new_unique(),
        transport_program: Pubkey::new_unique(),
        transport_authority: Pubkey::new_unique(),
        migration_manager: Pubkey::new_unique(),
        ledger_id: 1,
        minimum_reserve_percentage: 10,
        minimum_yield_vault_deposit: 1_000_000,
        max_slippage_bps: 50,
        transfer_fee_bps: 100, // 1% fee-on-transfer underlying
        reserved_assets: 0,
        migration_fees_fund: 0,
        net_collected_yield: 0,
        total_shares: 0,
        paused: false,
        entered: false,
        _reserved: [0u8; 32],
    }
}

// =========================================================================
// MIGRATION PLANNING
// =========================================================================

#[test]
fn test_exact_delivery_plans_clean_migration() {
    let vault = make_vault();

    let plan = vault.plan_migration(1_000_000_000, 1_000_000_000).unwrap();
    assert_eq!(plan.required_assets, 1_000_000_000);
    assert_eq!(plan.covered_discrepancy, 0);
    assert_eq!(plan.surplus_to_fund, 0);
    assert_eq!(
        plan.split.to_reserve + plan.split.to_yield_vault,
        1_000_000_000
    );
}

#[test]
fn test_fee_shortfall_covered_by_fund() {
    let mut vault = make_vault();
    vault.migration_fees_fund = 50_000_000;

    // 1% fee ate 10e6 of the backing on the way in
    let plan = vault.plan_migration(1_000_000_000, 990_000_000).unwrap();
    assert_eq!(plan.covered_discrepancy, 10_000_000);
    assert_eq!(plan.surplus_to_fund, 0);
    // Backing portion is what actually arrived
    assert_eq!(
        plan.split.to_reserve + plan.split.to_yield_vault,
        990_000_000
    );

    vault.record_migration(&plan, plan.split.to_yield_vault).unwrap();
    assert_eq!(vault.migration_fees_fund, 40_000_000);
    assert_eq!(vault.total_shares, 1_000_000_000);
    // Reserve holds its split plus the fund cover: fully backed again
    let staked = plan.split.to_yield_vault;
    assert!(vault.is_fully_backed(staked));
}

#[test]
fn test_unfundable_shortfall_rejects_whole_migration() {
    let mut vault = make_vault();
    vault.migration_fees_fund = 5_000_000;

    // Needs 10e6 of cover, fund holds 5e6: no partial mint, hard failure
    let err = vault
        .plan_migration(1_000_000_000, 990_000_000)
        .unwrap_err();
    assert_eq!(err, VaultError::CannotCompleteMigration.into());

    // Untouched state: the operation can be retried after a donation
    assert_eq!(vault.migration_fees_fund, 5_000_000);
    assert_eq!(vault.total_shares, 0);
}

#[test]
fn test_over_delivery_accrues_to_fund() {
    let mut vault = make_vault();

    let plan = vault.plan_migration(1_000_000_000, 1_003_000_000).unwrap();
    assert_eq!(plan.covered_discrepancy, 0);
    assert_eq!(plan.surplus_to_fund, 3_000_000);
    // Only the required backing is split; the surplus is earmarked
    assert_eq!(
        plan.split.to_reserve + plan.split.to_yield_vault,
        1_000_000_000
    );

    vault.record_migration(&plan, plan.split.to_yield_vault).unwrap();
    assert_eq!(vault.migration_fees_fund, 3_000_000);
}

#[test]
fn test_zero_share_migration_rejected() {
    let vault = make_vault();
    let err = vault.plan_migration(0, 1_000_000).unwrap_err();
    assert_eq!(err, VaultError::ZeroShares.into());
}

#[test]
fn test_migration_split_respects_reserve_target() {
    let vault = make_vault();

    let plan = vault.plan_migration(1_000_000_000, 1_000_000_000).unwrap();
    // Fresh vault: 10% of the post-mint supply stays liquid
    assert_eq!(plan.split.to_reserve, 100_000_000);
    assert_eq!(plan.split.to_yield_vault, 900_000_000);
}

#[test]
fn test_sequential_migrations_accumulate() {
    let mut vault = make_vault();
    vault.migration_fees_fund = 30_000_000;
    let mut staked = 0u64;

    for _ in 0..3 {
        let plan = vault.plan_migration(500_000_000, 495_000_000).unwrap();
        vault.record_migration(&plan, plan.split.to_yield_vault).unwrap();
        staked += plan.split.to_yield_vault;
    }

    assert_eq!(vault.total_shares, 1_500_000_000);
    assert_eq!(vault.migration_fees_fund, 30_000_000 - 3 * 5_000_000);
    assert!(vault.is_fully_backed(staked));
}

// =========================================================================
// CONVERTER BINDING REGISTRY
// =========================================================================

fn make_binding() -> ConverterBinding {
    ConverterBinding {
        bump: 254,
        vault: Pubkey::new_unique(),
        origin_ledger_id: 7,
        converter: [0x42; 32],
        enabled: true,
    }
}

#[test]
fn test_binding_authorizes_only_bound_converter() {
    let binding = make_binding();

    assert!(binding.authorizes(&[0x42; 32]));
    // Any other sender claiming the same origin ledger is rejected
    assert!(!binding.authorizes(&[0x43; 32]));
    assert!(!binding.authorizes(&[0u8; 32]));
}

#[test]
fn test_disabled_binding_rejects_bound_converter() {
    let mut binding = make_binding();
    binding.enabled = false;

    // Clearing a binding revokes the converter without deallocating the PDA
    assert!(!binding.authorizes(&[0x42; 32]));
}

// =========================================================================
// CROSS-LEDGER INSTRUCTION CODEC
// =========================================================================

#[test]
fn test_complete_migration_round_trips() {
    let msg = CrossLedgerInstruction::CompleteMigration {
        shares: 123_456_789,
        assets: 987_654_321,
    };
    let bytes = msg.encode().unwrap();
    assert_eq!(CrossLedgerInstruction::decode(&bytes).unwrap(), msg);
}

#[test]
fn test_custom_payload_round_trips() {
    let msg = CrossLedgerInstruction::Custom {
        payload: vec![0xde, 0xad, 0xbe, 0xef],
    };
    let bytes = msg.encode().unwrap();
    assert_eq!(CrossLedgerInstruction::decode(&bytes).unwrap(), msg);
}

#[test]
fn test_decode_rejects_trailing_bytes() {
    let mut bytes = CrossLedgerInstruction::CompleteMigration {
        shares: 1,
        assets: 1,
    }
    .encode()
    .unwrap();
    bytes.push(0);

    let err = CrossLedgerInstruction::decode(&bytes).unwrap_err();
    assert_eq!(err, VaultError::InvalidInstructionPayload.into());
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(CrossLedgerInstruction::decode(&[]).is_err());
    assert!(CrossLedgerInstruction::decode(&[7, 7, 7]).is_err());
}
