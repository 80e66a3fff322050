use super::actions::{OrderAction, OrderActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderId, OrderQuery, OrderStatus};
use crate::error::BookstoreError;

impl Entity for Order {
    type Id = OrderId;
    type CreateParams = OrderCreate;
    type Patch = ();
    type Query = OrderQuery;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = BookstoreError;

    const KIND: &'static str = "order";

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// New orders always start out waiting for payment.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, BookstoreError> {
        if params.quantity == 0 {
            return Err(BookstoreError::invalid("quantity minimum is 1"));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            book_id: params.book_id,
            quantity: params.quantity,
            total_price: params.total_price,
            status: OrderStatus::WaitingForPayment,
            created_at: params.created_at,
        })
    }

    /// One unpaid order per user and book.
    fn unique_key(&self) -> Option<String> {
        self.status
            .holds_stock()
            .then(|| format!("pending:{}:{}", self.user_id, self.book_id))
    }

    fn matches(&self, query: &OrderQuery) -> bool {
        match query {
            OrderQuery::All => true,
            OrderQuery::ByUser(user_id) => &self.user_id == user_id,
            OrderQuery::ByStatus(status) => self.status == *status,
            OrderQuery::Pending { user_id, book_id } => {
                self.status.holds_stock() && &self.user_id == user_id && &self.book_id == book_id
            }
        }
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), BookstoreError> {
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, BookstoreError> {
        match action {
            OrderAction::Transition { to } => {
                let from = self.status;
                if from != to {
                    if !from.can_transition_to(to) {
                        return Err(BookstoreError::InvalidTransition { from, to });
                    }
                    self.status = to;
                }
                Ok(OrderActionResult::Transition { from, order: self.clone() })
            }
        }
    }
}
