use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::{OrderClient, UserClient};
use crate::domain::{clamp_limit, OrderId, OrderStatus, Payment, PaymentCreate, PaymentId, PaymentQuery, UserId};
use crate::error::{BookstoreError, Result};

/// Client for the payment collection. Recording a payment is what moves an order to Paid.
#[derive(Clone)]
pub struct PaymentClient {
    inner: ResourceClient<Payment>,
    order_client: OrderClient,
    user_client: UserClient,
}

impl PaymentClient {
    pub fn new(inner: ResourceClient<Payment>, order_client: OrderClient, user_client: UserClient) -> Self {
        Self {
            inner,
            order_client,
            user_client,
        }
    }

    /// Records the payment of an unpaid order and marks the order Paid.
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty receipt.
    /// - `NotFound` if the user or the order does not exist.
    /// - `Unauthorized` if the order belongs to another user.
    /// - `InvalidTransition` if the order is no longer waiting for payment.
    /// - `AlreadyExists` if the order already has a payment.
    #[instrument(skip(self))]
    pub async fn add_payment(&self, user_id: UserId, order_id: OrderId, receipt: String) -> Result<PaymentId> {
        info!("Processing add_payment request");
        if receipt.trim().is_empty() {
            return Err(BookstoreError::invalid("receipt is required"));
        }

        self.user_client.get_user(user_id.clone()).await?;
        let order = self.order_client.get_order(order_id.clone()).await?;
        if order.user_id != user_id {
            warn!(owner = %order.user_id, "Order belongs to another user");
            return Err(BookstoreError::Unauthorized("order belongs to another user".to_string()));
        }
        if order.status != OrderStatus::WaitingForPayment {
            return Err(BookstoreError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Paid,
            });
        }

        let payment_id = self
            .inner
            .create(PaymentCreate {
                user_id,
                order_id: order_id.clone(),
                receipt,
            })
            .await?;

        // The order may have been reclaimed since the check above.
        if let Err(e) = self.order_client.mark_paid(order_id).await {
            error!(error = %e, %payment_id, "Order could not be marked paid, removing payment");
            if let Err(delete_err) = self.inner.delete(payment_id).await {
                error!(error = %delete_err, "Removing payment failed");
            }
            return Err(e);
        }
        info!(%payment_id, "Payment recorded");
        Ok(payment_id)
    }

    #[instrument(skip(self))]
    pub async fn get_payment_by_order(&self, order_id: OrderId) -> Result<Payment> {
        debug!("Sending request");
        self.inner
            .find(PaymentQuery::ByOrder(order_id.clone()), 1)
            .await?
            .pop()
            .ok_or(BookstoreError::NotFound { kind: "payment", id: order_id })
    }

    #[instrument(skip(self))]
    pub async fn list_payments_by_user(&self, user_id: UserId, limit: usize) -> Result<Vec<Payment>> {
        debug!("Sending request");
        self.inner.find(PaymentQuery::ByUser(user_id), clamp_limit(limit)).await
    }
}

impl_client_methods!(PaymentClient, Payment, payment);
impl_client_shutdown!(PaymentClient);
