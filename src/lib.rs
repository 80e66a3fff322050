//! Bookstore backend core: books, users, orders and payments held by
//! single-owner store actors, plus the reclaimer that returns the stock of
//! orders nobody paid for.

pub mod actor_framework;
pub mod app_system;
pub mod book_actor;
pub mod clients;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod order_actor;
pub mod password;
pub mod payment_actor;
pub mod reclaimer;
pub mod user_actor;

#[cfg(test)]
mod mock_framework;

pub use app_system::BookstoreSystem;
pub use error::{BookstoreError, Result};
