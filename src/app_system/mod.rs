//! System orchestration, startup, and shutdown logic.

pub mod bookstore_system;
pub mod telemetry;

pub use bookstore_system::*;
pub use telemetry::*;
