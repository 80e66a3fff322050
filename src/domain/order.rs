use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, OrderId, UserId};
use crate::error::BookstoreError;

/// Where an order is in its life.
///
/// ```text
/// WAITING_FOR_PAYMENT ──► PAID ──► ON_SHIPPING
///          │
///          ├──► CANCELLED
///          └──► DECLINED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    WaitingForPayment,
    Paid,
    Cancelled,
    Declined,
    OnShipping,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::WaitingForPayment,
        OrderStatus::Paid,
        OrderStatus::Cancelled,
        OrderStatus::Declined,
        OrderStatus::OnShipping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::WaitingForPayment => "WAITING_FOR_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Declined => "DECLINED",
            OrderStatus::OnShipping => "ON_SHIPPING",
        }
    }

    /// Whether `self -> next` is a legal move. Staying put is not a move.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (WaitingForPayment, Paid | Cancelled | Declined) => true,
            (Paid, OnShipping) => true,
            (WaitingForPayment, WaitingForPayment | OnShipping) => false,
            (Paid, WaitingForPayment | Paid | Cancelled | Declined) => false,
            (Cancelled | Declined | OnShipping, _) => false,
        }
    }

    /// The order still holds a stock reservation that nobody has settled or released.
    pub fn holds_stock(self) -> bool {
        self == OrderStatus::WaitingForPayment
    }

    /// Entering this status gives the reserved units back to the book.
    pub fn releases_stock(self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Declined)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = BookstoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| BookstoreError::invalid(format!("unknown order status: {s}")))
    }
}

/// Represents a customer order for a single title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub quantity: u32,
    /// Unit price times quantity, frozen when the stock was reserved.
    pub total_price: u64,
    pub status: OrderStatus,
    /// Serialized as RFC 3339.
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: UserId,
    pub book_id: BookId,
    pub quantity: u32,
    pub total_price: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderQuery {
    All,
    ByUser(UserId),
    ByStatus(OrderStatus),
    /// The order of this user for this book that still waits for payment.
    Pending { user_id: UserId, book_id: BookId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiting_orders_can_be_paid_cancelled_or_declined() {
        let from = OrderStatus::WaitingForPayment;
        assert!(from.can_transition_to(OrderStatus::Paid));
        assert!(from.can_transition_to(OrderStatus::Cancelled));
        assert!(from.can_transition_to(OrderStatus::Declined));
        assert!(!from.can_transition_to(OrderStatus::OnShipping));
    }

    #[test]
    fn paid_orders_only_move_to_shipping() {
        let from = OrderStatus::Paid;
        assert!(from.can_transition_to(OrderStatus::OnShipping));
        assert!(!from.can_transition_to(OrderStatus::Cancelled));
        assert!(!from.can_transition_to(OrderStatus::Declined));
        assert!(!from.can_transition_to(OrderStatus::WaitingForPayment));
    }

    #[test]
    fn terminal_states_do_not_move() {
        for from in [OrderStatus::Cancelled, OrderStatus::Declined, OrderStatus::OnShipping] {
            for to in OrderStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn status_parses_wire_names() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!(matches!(
            "SHIPPED".parse::<OrderStatus>(),
            Err(BookstoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn order_serializes_with_rfc3339_timestamp() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let order = Order {
            id: "o1".into(),
            user_id: "u1".into(),
            book_id: "b1".into(),
            quantity: 2,
            total_price: 3000,
            status: OrderStatus::WaitingForPayment,
            created_at,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "WAITING_FOR_PAYMENT");
        assert_eq!(json["created_at"], "2024-05-01T10:00:00Z");

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }
}
