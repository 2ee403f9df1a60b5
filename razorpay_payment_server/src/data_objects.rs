use std::fmt::Display;

use razorpay_payment_engine::db_types::{CartItem, Customer};
use rpg_common::Amount;
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// The body of a `/create-order` call, as sent by the storefront checkout.
///
/// `amount` is in major units (rupees) and may be a number or a numeric string. The customer and the cart are
/// optional here so that their absence is reported as invalid order data rather than as a JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: Amount,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default, rename = "cartItems", alias = "cart_items")]
    pub cart_items: Option<Vec<CartItem>>,
}

/// A validated order-creation request
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub amount: Amount,
    pub customer: Customer,
    pub cart_items: Vec<CartItem>,
}

impl TryFrom<CreateOrderRequest> for OrderDetails {
    type Error = ServerError;

    fn try_from(value: CreateOrderRequest) -> Result<Self, Self::Error> {
        let customer = value.customer.ok_or_else(|| ServerError::InvalidOrderData("Missing customer.".into()))?;
        let cart_items = value.cart_items.ok_or_else(|| ServerError::InvalidOrderData("Missing cartItems.".into()))?;
        Ok(Self { amount: value.amount, customer, cart_items })
    }
}
