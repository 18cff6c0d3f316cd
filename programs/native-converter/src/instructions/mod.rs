//! Instruction handlers for NativeConverter.

pub mod admin;
pub mod convert;
pub mod initialize;
pub mod migrate;

pub use admin::*;
pub use convert::*;
pub use initialize::*;
pub use migrate::*;
