use crate::domain::{Order, OrderStatus};

/// Custom actions for Order documents.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Compare-and-set status change, checked against the lifecycle inside the store.
    ///
    /// Asking for the status the order already has succeeds without changes,
    /// so retries are harmless.
    Transition { to: OrderStatus },
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    /// The status before the call and the order as stored afterwards.
    Transition { from: OrderStatus, order: Order },
}
