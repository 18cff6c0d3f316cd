//! Constants for the vault token program.

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Seed for VaultState PDA: ["vault", underlying_mint]
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for the liquid reserve token account: ["reserve", vault]
pub const RESERVE_SEED: &[u8] = b"reserve";

/// Seed for the claim token mint: ["claim_mint", vault]
pub const CLAIM_MINT_SEED: &[u8] = b"claim_mint";

/// Seed for the vault's own claim token escrow: ["claim_escrow", vault]
/// Holds claim tokens minted to self before they are forwarded through the
/// transport (bridged deposits and phantom liquidity).
pub const CLAIM_ESCROW_SEED: &[u8] = b"claim_escrow";

/// Seed for the migration inbox token account: ["migration_inbox", vault]
/// Destination of asset legs the transport delivers directly to this vault.
pub const MIGRATION_INBOX_SEED: &[u8] = b"migration_inbox";

/// Seed for per-origin-ledger converter bindings:
/// ["converter", vault, origin_ledger_id]
pub const CONVERTER_BINDING_SEED: &[u8] = b"converter";

// =============================================================================
// ACCOUNTING
// =============================================================================

/// Denominator for the minimum reserve percentage (whole percents, 0-100).
pub const PERCENTAGE_DENOMINATOR: u64 = 100;

/// Basis points denominator (transfer fee estimator, slippage tolerance).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Destination of phantom liquidity forwards: the non-claimable all-zero
/// address on the origin ledger. Nothing can ever spend from it; it exists
/// only to keep claim-token supply in sync with secondary-ledger circulation.
pub const ZERO_ADDRESS: [u8; 32] = [0u8; 32];
