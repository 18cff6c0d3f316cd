//! Constants for the native converter program.

/// Seed for ConverterState PDA: ["converter_state", underlying_mint]
pub const CONVERTER_STATE_SEED: &[u8] = b"converter_state";

/// Seed for the local backing token account: ["backing", converter]
pub const BACKING_SEED: &[u8] = b"backing";

/// Seed for the local representation mint: ["local_mint", converter]
pub const LOCAL_MINT_SEED: &[u8] = b"local_mint";

/// Denominator for the non-migratable percentage (whole percents, 0-100).
pub const PERCENTAGE_DENOMINATOR: u64 = 100;
