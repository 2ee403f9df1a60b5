//! Builders for orders and gateway notifications used across the test suites.
use rpg_common::Amount;
use serde_json::json;

use crate::{
    db_types::{CartItem, Customer, NewOrder, OrderId},
    helpers::calculate_hmac,
    webhook_objects::WebhookEvent,
};

pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_DO_NOT_USE_IN_PRODUCTION";

pub fn sample_customer() -> Customer {
    Customer::new("Asha Rao", "+919800000000", "12 MG Road, Bengaluru 560001")
}

pub fn sample_items() -> Vec<CartItem> {
    vec![CartItem::new("Cold-pressed groundnut oil 1L", 2), CartItem::new("A2 cow ghee 500ml", 1)]
}

pub fn new_order(order_id: &str, amount: f64) -> NewOrder {
    let amount = Amount::from_major(amount).expect("Invalid test amount");
    NewOrder::new(OrderId::from(order_id), amount, sample_customer(), sample_items())
        .with_receipt(format!("test_receipt_{order_id}"))
}

/// The raw JSON body of a `payment.captured` notification, as the gateway would send it.
pub fn capture_body(order_id: &str, payment_id: &str) -> Vec<u8> {
    json!({
        "entity": "event",
        "account_id": "acc_TEST0000000001",
        "event": "payment.captured",
        "contains": ["payment"],
        "payload": {
            "payment": {
                "entity": {
                    "id": payment_id,
                    "entity": "payment",
                    "currency": "INR",
                    "status": "captured",
                    "order_id": order_id,
                    "method": "upi",
                    "captured": true
                }
            }
        },
        "created_at": 1_700_000_000
    })
    .to_string()
    .into_bytes()
}

pub fn capture_event(order_id: &str, payment_id: &str) -> WebhookEvent {
    WebhookEvent::from_slice(&capture_body(order_id, payment_id)).expect("Invalid capture event fixture")
}

/// Signs `body` with [`TEST_WEBHOOK_SECRET`].
pub fn sign(body: &[u8]) -> String {
    calculate_hmac(TEST_WEBHOOK_SECRET.as_bytes(), body)
}
