//! Plain documents and their payloads. No store or actor concerns live here.

pub mod book;
pub mod order;
pub mod payment;
pub mod user;

pub use book::*;
pub use order::*;
pub use payment::*;
pub use user::*;

use uuid::Uuid;

pub type BookId = String;
pub type UserId = String;
pub type OrderId = String;
pub type PaymentId = String;

const DEFAULT_LIST_LIMIT: usize = 10;
const MAX_LIST_LIMIT: usize = 100;

/// Fresh document id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Page size for list operations: anything outside `10..=100` falls back to 10.
pub fn clamp_limit(limit: usize) -> usize {
    if (DEFAULT_LIST_LIMIT..=MAX_LIST_LIMIT).contains(&limit) {
        limit
    } else {
        DEFAULT_LIST_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_keeps_values_in_range() {
        assert_eq!(clamp_limit(10), 10);
        assert_eq!(clamp_limit(55), 55);
        assert_eq!(clamp_limit(100), 100);
    }

    #[test]
    fn clamp_limit_falls_back_to_default() {
        assert_eq!(clamp_limit(0), 10);
        assert_eq!(clamp_limit(9), 10);
        assert_eq!(clamp_limit(101), 10);
    }

    #[test]
    fn new_ids_are_distinct() {
        assert_ne!(new_id(), new_id());
    }
}
