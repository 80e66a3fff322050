use crate::actor_framework::Entity;
use crate::domain::{Payment, PaymentCreate, PaymentId, PaymentQuery};
use crate::error::BookstoreError;

impl Entity for Payment {
    type Id = PaymentId;
    type CreateParams = PaymentCreate;
    type Patch = ();
    type Query = PaymentQuery;
    type Action = ();
    type ActionResult = ();
    type Error = BookstoreError;

    const KIND: &'static str = "payment";

    fn id(&self) -> &PaymentId {
        &self.id
    }

    fn from_create_params(id: PaymentId, params: PaymentCreate) -> Result<Self, BookstoreError> {
        if params.receipt.trim().is_empty() {
            return Err(BookstoreError::invalid("receipt is required"));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            order_id: params.order_id,
            receipt: params.receipt,
        })
    }

    /// At most one payment per order.
    fn unique_key(&self) -> Option<String> {
        Some(self.order_id.clone())
    }

    fn matches(&self, query: &PaymentQuery) -> bool {
        match query {
            PaymentQuery::All => true,
            PaymentQuery::ByOrder(order_id) => &self.order_id == order_id,
            PaymentQuery::ByUser(user_id) => &self.user_id == user_id,
        }
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), BookstoreError> {
        Ok(())
    }

    /// Payments are immutable once recorded.
    fn handle_action(&mut self, _action: ()) -> Result<(), BookstoreError> {
        Ok(())
    }
}
