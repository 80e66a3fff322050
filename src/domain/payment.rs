use serde::{Deserialize, Serialize};

use super::{OrderId, PaymentId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub order_id: OrderId,
    pub receipt: String,
}

#[derive(Debug, Clone)]
pub struct PaymentCreate {
    pub user_id: UserId,
    pub order_id: OrderId,
    pub receipt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentQuery {
    All,
    ByOrder(OrderId),
    ByUser(UserId),
}
