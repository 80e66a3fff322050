use crate::domain::OrderId;

/// Custom actions for Book documents.
///
/// Every stock movement is one of these, applied inside the book store, so
/// no caller ever reads a counter and writes back a computed value.
#[derive(Debug, Clone)]
pub enum BookAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Takes `quantity` units out of stock and records them as held by `order_id`.
    ///
    /// Fails without touching stock if fewer units are available. Repeating it
    /// for an order that already holds units returns the existing hold.
    Reserve { order_id: OrderId, quantity: u32 },
    /// Gives the units held by `order_id` back to stock. No-op when nothing is held.
    Release { order_id: OrderId },
    /// Drops the hold of a paid order; its units stay sold.
    Settle { order_id: OrderId },
    /// Adds units to stock.
    Restock(u32),
    /// Takes units out of stock without a hold. Rejected if stock would go negative.
    Withdraw(u32),
}

/// Results from BookActions - variants match 1:1 with BookAction
#[derive(Debug, Clone, PartialEq)]
pub enum BookActionResult {
    CheckStock(u32),
    Reserve(Reservation),
    /// Units returned to stock, `None` if the order held nothing.
    Release(Option<u32>),
    /// Units that were held, `None` if the order held nothing.
    Settle(Option<u32>),
    /// Stock level after the restock.
    Restock(u32),
    /// Stock level after the withdrawal.
    Withdraw(u32),
}

/// What a successful reservation granted.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub quantity: u32,
    pub unit_price: u64,
    pub total_price: u64,
    /// Stock left for other orders.
    pub remaining: u32,
}
