//! Unit-level tests for the converter's issuance and migration-cap logic.

use anchor_lang::prelude::Pubkey;
use native_converter::{ConverterError, ConverterState};

fn make_converter() -> ConverterState {
    ConverterState {
        bump: 255,
        version: 1,
        admin: Pubkey::new_unique(),
        underlying_mint: Pubkey::new_unique(),
        underlying_decimals: 6,
        local_mint: Pubkey::new_unique(),
        backing_account: Pubkey::new_unique(),
        transport_program: Pubkey::new_unique(),
        ledger_id: 7,
        destination_ledger_id: 1,
        destination_address: [0x11; 32],
        non_migratable_percentage: 20,
        total_issued: 0,
        total_migrated: 0,
        paused: false,
        _reserved: [0u8; 32],
    }
}

// =========================================================================
// MIGRATION CAP
// =========================================================================

#[test]
fn test_floor_is_fraction_of_current_backing() {
    let converter = make_converter();

    assert_eq!(
        converter.minimum_local_backing(1_000_000_000).unwrap(),
        200_000_000
    );
    assert_eq!(
        converter.migratable_backing(1_000_000_000).unwrap(),
        800_000_000
    );
}

#[test]
fn test_floor_rounds_up() {
    let mut converter = make_converter();
    converter.non_migratable_percentage = 33;

    // 33% of 100 = 33 exactly; 33% of 101 = 33.33 rounds to 34
    assert_eq!(converter.minimum_local_backing(100).unwrap(), 33);
    assert_eq!(converter.minimum_local_backing(101).unwrap(), 34);
}

#[test]
fn test_floor_tracks_backing_not_supply() {
    let mut converter = make_converter();
    converter.non_migratable_percentage = 100;

    // Backing can exceed outstanding supply (donations, stray transfers);
    // the floor still pins all of it.
    converter.total_issued = 0;
    assert_eq!(converter.migratable_backing(1_000_000).unwrap(), 0);

    // And a drained backing owes nothing regardless of supply.
    converter.total_issued = 1_000_000_000;
    assert_eq!(converter.minimum_local_backing(0).unwrap(), 0);
    assert_eq!(converter.migratable_backing(0).unwrap(), 0);
}

#[test]
fn test_zero_percentage_frees_all_backing() {
    let mut converter = make_converter();
    converter.non_migratable_percentage = 0;

    assert_eq!(
        converter.migratable_backing(1_000_000_000).unwrap(),
        1_000_000_000
    );
}

#[test]
fn test_full_percentage_pins_all_backing() {
    let mut converter = make_converter();
    converter.non_migratable_percentage = 100;

    assert_eq!(converter.migratable_backing(1_000_000_000).unwrap(), 0);
}

// =========================================================================
// ISSUANCE LEDGER
// =========================================================================

#[test]
fn test_issuance_tracks_supply() {
    let mut converter = make_converter();

    converter.record_convert(500_000_000).unwrap();
    converter.record_convert(250_000_000).unwrap();
    assert_eq!(converter.total_issued, 750_000_000);

    converter.record_deconvert(100_000_000).unwrap();
    assert_eq!(converter.total_issued, 650_000_000);
}

#[test]
fn test_deconvert_beyond_supply_is_rejected() {
    let mut converter = make_converter();
    converter.record_convert(100).unwrap();

    let err = converter.record_deconvert(101).unwrap_err();
    assert_eq!(err, ConverterError::MathOverflow.into());
}

#[test]
fn test_migration_total_accumulates_without_touching_supply() {
    let mut converter = make_converter();
    converter.record_convert(1_000_000_000).unwrap();

    converter.record_migration(300_000_000).unwrap();
    converter.record_migration(200_000_000).unwrap();
    assert_eq!(converter.total_migrated, 500_000_000);
    // Migrating backing never changes what users hold
    assert_eq!(converter.total_issued, 1_000_000_000);
}

#[test]
fn test_floor_shrinks_as_backing_drains() {
    let converter = make_converter();

    // Each migration leaves 20% of whatever remains: the cap is geometric,
    // never an outright drain.
    assert_eq!(
        converter.migratable_backing(1_000_000_000).unwrap(),
        800_000_000
    );
    assert_eq!(
        converter.migratable_backing(200_000_000).unwrap(),
        160_000_000
    );
    assert_eq!(converter.migratable_backing(40_000_000).unwrap(), 32_000_000);
}
