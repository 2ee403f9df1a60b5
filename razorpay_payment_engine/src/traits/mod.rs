mod order_gateway;
mod order_store;

pub use order_gateway::{GatewayOrder, GatewayOrderRequest, OrderGateway, OrderGatewayError};
pub use order_store::{OrderStore, OrderStoreError, StatusTransition};
