use thiserror::Error;

use crate::actor_framework::StoreError;
use crate::domain::OrderStatus;

/// Every failure a bookstore operation can report.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookstoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} already exists: {key}")]
    AlreadyExists { kind: &'static str, key: String },
    #[error("Insufficient stock for book {book_id}: requested {requested}, available {available}")]
    InsufficientStock {
        book_id: String,
        requested: u32,
        available: u32,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BookstoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StoreError> for BookstoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => Self::NotFound { kind, id },
            StoreError::AlreadyExists { kind, key } => Self::AlreadyExists { kind, key },
            StoreError::Unavailable { kind } => Self::StorageUnavailable(format!("{kind} store closed")),
        }
    }
}

pub type Result<T, E = BookstoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_onto_domain_kinds() {
        let err: BookstoreError = StoreError::NotFound { kind: "book", id: "b1".into() }.into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "book not found: b1");

        let err: BookstoreError = StoreError::Unavailable { kind: "order" }.into();
        assert_eq!(err, BookstoreError::StorageUnavailable("order store closed".into()));
    }

    #[test]
    fn transition_error_renders_wire_names() {
        let err = BookstoreError::InvalidTransition {
            from: OrderStatus::Paid,
            to: OrderStatus::Cancelled,
        };
        assert_eq!(err.to_string(), "Invalid status transition: PAID -> CANCELLED");
    }
}
