//! Book-specific document logic, including the stock hold ledger.

mod actions;
pub mod entity;

pub use actions::*;
