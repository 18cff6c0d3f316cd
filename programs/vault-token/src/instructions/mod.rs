//! Instruction handlers for VaultToken.

pub mod admin;
pub mod deposit;
pub mod donate;
pub mod initialize;
pub mod migration;
pub mod rebalance;
pub mod withdraw;
pub mod yield_ops;

pub use admin::*;
pub use deposit::*;
pub use donate::*;
pub use initialize::*;
pub use migration::*;
pub use rebalance::*;
pub use withdraw::*;
pub use yield_ops::*;
