use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::OrderId;

/// The request sent to the payment gateway to open a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrderRequest {
    /// The order total in minor units (e.g. paise)
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// The gateway's view of an order after creation. `raw` holds the full response, which is passed back to the client
/// untouched since the client-side checkout widget needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayOrder {
    pub order_id: OrderId,
    pub raw: serde_json::Value,
}

/// The order-creation collaborator. The engine only needs an opaque order id back.
#[allow(async_fn_in_trait)]
pub trait OrderGateway {
    async fn create_gateway_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, OrderGatewayError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderGatewayError {
    #[error("The payment gateway rejected the order. {0}")]
    Rejected(String),
    #[error("Could not communicate with the payment gateway. {0}")]
    Unavailable(String),
}
