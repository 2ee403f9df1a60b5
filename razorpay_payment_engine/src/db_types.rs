use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use rpg_common::Amount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//--------------------------------------        OrderId        ---------------------------------------------------------
/// The order identifier assigned by the payment gateway when the order was created. It is the primary key for orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatusType {
    /// The order has been created on the gateway, and no capture event has been seen for it.
    Pending,
    /// A verified `payment.captured` event has been received for the order. This is a terminal state.
    Paid,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "PENDING"),
            OrderStatusType::Paid => write!(f, "PAID"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            _ => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------       Customer        ---------------------------------------------------------
/// Contact and delivery details for the buyer. The engine does not interpret these; they are forwarded to the
/// merchant notification as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "phone", alias = "contact")]
    pub mobile: String,
    #[serde(default)]
    pub address: String,
}

impl Customer {
    pub fn new<S: Into<String>>(name: S, mobile: S, address: S) -> Self {
        Self { name: name.into(), mobile: mobile.into(), address: address.into() }
    }
}

//--------------------------------------       CartItem        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    #[serde(alias = "quantity")]
    pub qty: u32,
}

impl CartItem {
    pub fn new<S: Into<String>>(name: S, qty: u32) -> Self {
        Self { name: name.into(), qty }
    }
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// The order_id as assigned by the payment gateway
    pub order_id: OrderId,
    /// The order total, in major units
    pub amount: Amount,
    pub currency: String,
    /// The receipt label that was sent to the gateway when the order was created
    pub receipt: String,
    pub customer: Customer,
    /// The cart contents, in the order the client sent them
    pub cart_items: Vec<CartItem>,
}

impl NewOrder {
    pub fn new(order_id: OrderId, amount: Amount, customer: Customer, cart_items: Vec<CartItem>) -> Self {
        Self { order_id, amount, currency: "INR".to_string(), receipt: String::default(), customer, cart_items }
    }

    pub fn with_currency<S: Into<String>>(mut self, currency: S) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_receipt<S: Into<String>>(mut self, receipt: S) -> Self {
        self.receipt = receipt.into();
        self
    }

    /// Returns true if `order` was created from a `NewOrder` with exactly the same details as this one.
    pub fn is_equivalent(&self, order: &Order) -> bool {
        self.order_id == order.order_id
            && self.amount == order.amount
            && self.currency == order.currency
            && self.receipt == order.receipt
            && self.customer == order.customer
            && self.cart_items == order.cart_items
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub amount: Amount,
    pub currency: String,
    pub receipt: String,
    pub customer: Customer,
    pub cart_items: Vec<CartItem>,
    pub status: OrderStatusType,
    /// The gateway payment id of the capture that paid for this order. Only set once the order is `Paid`.
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NewOrder> for Order {
    fn from(order: NewOrder) -> Self {
        let now = Utc::now();
        Self {
            order_id: order.order_id,
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt,
            customer: order.customer,
            cart_items: order.cart_items,
            status: OrderStatusType::Pending,
            payment_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order {} [{}] {} {} for {} ({} items)",
            self.order_id,
            self.status,
            self.amount,
            self.currency,
            self.customer.name,
            self.cart_items.len()
        )
    }
}
