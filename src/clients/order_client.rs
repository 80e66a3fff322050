use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::{BookClient, UserClient};
use crate::clock::Clock;
use crate::domain::{
    clamp_limit, new_id, BookId, Order, OrderCreate, OrderId, OrderQuery, OrderStatus, UserId,
};
use crate::error::{BookstoreError, Result};
use crate::order_actor::{OrderAction, OrderActionResult};

/// Client for interacting with the Order actor.
///
/// Besides plain lookups it runs the two order workflows that touch a second
/// collection: placing an order (reserve stock, then record the order) and
/// cancelling one (release the hold, then remove the order).
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    book_client: BookClient,
    clock: Arc<dyn Clock>,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        user_client: UserClient,
        book_client: BookClient,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner,
            user_client,
            book_client,
            clock,
        }
    }

    /// Reserves `quantity` units of the book for the user and records a pending order.
    ///
    /// # Errors
    /// - `InvalidArgument` for a zero quantity.
    /// - `NotFound` if the user or the book does not exist.
    /// - `AlreadyExists` if the user already has an unpaid order for this book.
    /// - `InsufficientStock` if fewer units are available; stock is left as it was.
    #[instrument(skip(self))]
    pub async fn place_order(&self, user_id: UserId, book_id: BookId, quantity: u32) -> Result<OrderId> {
        info!("Processing place_order request");
        if quantity == 0 {
            return Err(BookstoreError::invalid("quantity minimum is 1"));
        }

        // Step 1: Validate user and book
        let user = self.user_client.get_user(user_id.clone()).await?;
        let book = self.book_client.get_book(book_id.clone()).await?;
        debug!(user_name = %user.username, book_name = %book.name, "User and book found");

        // Step 2: One unpaid order per user and book
        let pending = OrderQuery::Pending {
            user_id: user_id.clone(),
            book_id: book_id.clone(),
        };
        if let Some(existing) = self.inner.find(pending, 1).await?.pop() {
            warn!(order_id = %existing.id, "Pending order already exists");
            return Err(BookstoreError::AlreadyExists {
                kind: "order",
                key: format!("pending:{user_id}:{book_id}"),
            });
        }

        // Step 3: Reserve stock under the new order id
        let order_id = new_id();
        let reservation = self
            .book_client
            .reserve_stock(book_id.clone(), order_id.clone(), quantity)
            .await
            .inspect_err(|e| error!(error = %e, "Stock reservation failed"))?;
        info!(remaining = reservation.remaining, "Stock reserved");

        // Step 4: Record the order, compensating if that fails
        let params = OrderCreate {
            user_id,
            book_id: book_id.clone(),
            quantity: reservation.quantity,
            total_price: reservation.total_price,
            created_at: self.clock.now(),
        };
        match self.inner.insert(order_id.clone(), params).await {
            Ok(id) => {
                info!(order_id = %id, total_price = reservation.total_price, "Order placed");
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "Order insert failed, releasing reservation");
                if let Err(release_err) = self.book_client.release_stock(book_id, order_id).await {
                    error!(error = %release_err, "Compensating release failed");
                }
                Err(e)
            }
        }
    }

    /// Records an order as given, without touching stock.
    #[instrument(skip(self))]
    pub async fn create_order(&self, order: OrderCreate) -> Result<OrderId> {
        debug!("Sending request");
        self.inner.create(order).await
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self, limit: usize) -> Result<Vec<Order>> {
        debug!("Sending request");
        self.inner.find(OrderQuery::All, clamp_limit(limit)).await
    }

    #[instrument(skip(self))]
    pub async fn list_orders_by_user(&self, user_id: UserId, limit: usize) -> Result<Vec<Order>> {
        debug!("Sending request");
        self.inner.find(OrderQuery::ByUser(user_id), clamp_limit(limit)).await
    }

    #[instrument(skip(self))]
    pub async fn list_orders_by_status(&self, status: OrderStatus, limit: usize) -> Result<Vec<Order>> {
        debug!("Sending request");
        self.inner.find(OrderQuery::ByStatus(status), clamp_limit(limit)).await
    }

    /// Oldest orders in `status`, at most `limit` of them. The limit is taken as is.
    #[instrument(skip(self))]
    pub async fn get_orders_by_status(&self, status: OrderStatus, limit: usize) -> Result<Vec<Order>> {
        debug!("Sending request");
        self.inner.find(OrderQuery::ByStatus(status), limit).await
    }

    /// Moves the order to `status` and applies the stock side effect of the new status.
    ///
    /// Cancelling runs the full cancellation, so the returned order no longer exists.
    #[instrument(skip(self))]
    pub async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        debug!("Sending request");
        if status == OrderStatus::Cancelled {
            return self.cancel_order(id).await;
        }
        if status == OrderStatus::Paid {
            return self.mark_paid(id).await;
        }
        let (from, order) = self.transition(id, status).await?;
        if status == OrderStatus::Declined {
            self.release_hold(&order).await?;
        }
        info!(%from, to = %status, "Order status updated");
        Ok(order)
    }

    /// Moves the order to Paid, then drops its hold so the units stay sold.
    ///
    /// Only the status change can fail. A hold that cannot be settled is
    /// logged and left on the book; it no longer counts as available stock.
    #[instrument(skip(self))]
    pub async fn mark_paid(&self, id: OrderId) -> Result<Order> {
        debug!("Sending request");
        let (from, order) = self.transition(id, OrderStatus::Paid).await?;
        match self
            .book_client
            .settle_stock(order.book_id.clone(), order.id.clone())
            .await
        {
            Ok(settled) => debug!(?settled, "Hold settled"),
            Err(e) => error!(error = %e, "Settling hold failed, order stays paid"),
        }
        info!(%from, to = %order.status, "Order status updated");
        Ok(order)
    }

    /// Removes an order, giving back any stock it still holds.
    ///
    /// Unpaid and cancelled orders go through the cancellation. Declined orders
    /// already returned their units and are simply removed.
    ///
    /// # Errors
    /// `InvalidTransition` for paid or shipped orders, which are never deleted.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<()> {
        debug!("Sending request");
        let order = self.get_order(id.clone()).await?;
        match order.status {
            OrderStatus::WaitingForPayment | OrderStatus::Cancelled => {
                self.cancel_order(id).await.map(|_| ())
            }
            OrderStatus::Declined => self.finish_cancellation(&order).await,
            OrderStatus::Paid | OrderStatus::OnShipping => Err(BookstoreError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            }),
        }
    }

    /// Cancels an unpaid order: status to Cancelled, hold released, order removed.
    ///
    /// # Errors
    /// `InvalidTransition` if the order was already paid, declined or shipped.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order> {
        debug!("Sending request");
        let (_, order) = self.transition(id, OrderStatus::Cancelled).await?;
        self.finish_cancellation(&order).await?;
        Ok(order)
    }

    /// Releases the hold of a cancelled order and removes it. Safe to repeat.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn finish_cancellation(&self, order: &Order) -> Result<()> {
        self.release_hold(order).await?;
        match self.inner.delete(order.id.clone()).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => debug!("Order already removed"),
            Err(e) => return Err(e),
        }
        info!(quantity = order.quantity, "Order cancelled and removed");
        Ok(())
    }

    async fn transition(&self, id: OrderId, to: OrderStatus) -> Result<(OrderStatus, Order)> {
        match self.inner.perform_action(id, OrderAction::Transition { to }).await? {
            OrderActionResult::Transition { from, order } => Ok((from, order)),
        }
    }

    async fn release_hold(&self, order: &Order) -> Result<()> {
        let released = self
            .book_client
            .release_stock(order.book_id.clone(), order.id.clone())
            .await
            .or_else(tolerate_missing_book)?;
        match released {
            Some(units) => debug!(units, "Stock restored"),
            None => debug!("No hold left to release"),
        }
        Ok(())
    }
}

impl_client_get!(OrderClient, Order, order);
impl_client_shutdown!(OrderClient);

/// A deleted book has no stock to give back.
fn tolerate_missing_book(err: BookstoreError) -> Result<Option<u32>> {
    if err.is_not_found() {
        warn!(error = %err, "Book is gone, nothing to restore");
        Ok(None)
    } else {
        Err(err)
    }
}
