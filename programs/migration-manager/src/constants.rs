//! Constants for the migration manager program.

/// Seed for the singleton ManagerState PDA: ["manager"]
pub const MANAGER_SEED: &[u8] = b"manager";

/// Seed for per-converter routing entries: ["token_pair", manager,
/// origin_ledger_id, converter]
pub const TOKEN_PAIR_SEED: &[u8] = b"token_pair";

/// Seed for the per-pair asset escrow: ["escrow", token_pair]
/// Destination of asset legs the transport delivers for this pair.
pub const ESCROW_SEED: &[u8] = b"escrow";
