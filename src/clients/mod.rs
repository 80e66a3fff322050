//! Typed front ends for the store actors. Clients are cheap to clone and safe to share.

#[macro_use]
mod macros;

mod book_client;
mod order_client;
mod payment_client;
mod user_client;

pub use book_client::BookClient;
pub use order_client::OrderClient;
pub use payment_client::PaymentClient;
pub use user_client::UserClient;
