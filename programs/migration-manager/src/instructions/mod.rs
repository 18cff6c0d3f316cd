//! Instruction handlers for MigrationManager.

pub mod admin;
pub mod configure;
pub mod initialize;
pub mod route;

pub use admin::*;
pub use configure::*;
pub use initialize::*;
pub use route::*;
