//! Glue between the gateway REST client and the engine's [`OrderGateway`] trait.
use log::*;
use razorpay_payment_engine::{
    db_types::OrderId,
    traits::{GatewayOrder, GatewayOrderRequest, OrderGateway, OrderGatewayError},
};
use razorpay_tools::{NewRazorpayOrder, RazorpayApi, RazorpayApiError, RazorpayConfig};

#[derive(Clone)]
pub struct RazorpayOrderGateway {
    api: RazorpayApi,
}

impl RazorpayOrderGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let api = RazorpayApi::new(config)?;
        Ok(Self { api })
    }
}

impl OrderGateway for RazorpayOrderGateway {
    async fn create_gateway_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, OrderGatewayError> {
        let new_order = NewRazorpayOrder::new(request.amount, request.currency, request.receipt);
        let order = self.api.create_order(new_order).await.map_err(|e| {
            error!("💻️ Could not create order on the payment gateway. {e}");
            gateway_error(e)
        })?;
        let raw = serde_json::to_value(&order).map_err(|e| OrderGatewayError::Unavailable(e.to_string()))?;
        Ok(GatewayOrder { order_id: OrderId::from(order.id), raw })
    }
}

fn gateway_error(e: RazorpayApiError) -> OrderGatewayError {
    match e {
        RazorpayApiError::QueryError { status, message } => {
            OrderGatewayError::Rejected(format!("Error {status}. {message}"))
        },
        e => OrderGatewayError::Unavailable(e.to_string()),
    }
}
