use std::time::Duration;

use cucumber::{then, when};
use razorpay_payment_engine::{
    db_types::{CartItem, Customer, NewOrder, OrderId, OrderStatusType},
    test_utils::fixtures::{capture_body, sign},
    OrderStore,
    WebhookOutcome,
};
use rpg_common::Amount;

use crate::cucumber::ReconciliationWorld;

#[when(expr = "I create order {word} for {float} INR for customer {string} with {int} cart items")]
async fn create_order(world: &mut ReconciliationWorld, order_id: String, amount: f64, customer: String, items: u32) {
    let amount = Amount::from_major(amount).expect("Invalid amount");
    let cart = (1..=items).map(|i| CartItem::new(format!("Item {i}"), i)).collect::<Vec<_>>();
    let customer = Customer::new(customer.as_str(), "+910000000000", "1 Test Street");
    let order = NewOrder::new(OrderId::from(order_id), amount, customer, cart);
    world.api().create_order(order).await.expect("Error creating order");
}

#[when(expr = "the gateway delivers an authentic capture for order {word} with payment {word}")]
async fn authentic_capture(world: &mut ReconciliationWorld, order_id: String, payment_id: String) {
    let body = capture_body(&order_id, &payment_id);
    let signature = sign(&body);
    world.last_delivery = Some(world.system().deliver(&body, &signature).await);
}

#[when(expr = "the gateway delivers a tampered capture for order {word} with payment {word}")]
async fn tampered_capture(world: &mut ReconciliationWorld, order_id: String, payment_id: String) {
    // Sign a capture for a different order, then swap the body
    let signature = sign(&capture_body("order_someone_else", &payment_id));
    let body = capture_body(&order_id, &payment_id);
    world.last_delivery = Some(world.system().deliver(&body, &signature).await);
}

#[when(expr = "the gateway delivers an authentic {string} event")]
async fn authentic_other_event(world: &mut ReconciliationWorld, event: String) {
    let body = format!(r#"{{"entity":"event","event":"{event}","payload":{{}}}}"#).into_bytes();
    let signature = sign(&body);
    world.last_delivery = Some(world.system().deliver(&body, &signature).await);
}

#[then("the notification is acknowledged")]
async fn acknowledged(world: &mut ReconciliationWorld) {
    let result = world.last_delivery.as_ref().expect("Nothing was delivered");
    assert!(result.is_ok(), "Delivery was not acknowledged: {result:?}");
}

#[then("the notification is rejected")]
async fn rejected(world: &mut ReconciliationWorld) {
    let result = world.last_delivery.as_ref().expect("Nothing was delivered");
    assert!(result.is_err(), "Delivery was not rejected: {result:?}");
}

#[then(expr = "the outcome is {word}")]
async fn outcome_is(world: &mut ReconciliationWorld, expected: String) {
    let result = world.last_delivery.as_ref().expect("Nothing was delivered");
    let outcome = result.as_ref().expect("Delivery failed");
    let name = match outcome {
        WebhookOutcome::OrderPaid(_) => "OrderPaid",
        WebhookOutcome::AlreadyPaid(_) => "AlreadyPaid",
        WebhookOutcome::UnknownOrder(_) => "UnknownOrder",
        WebhookOutcome::Ignored(_) => "Ignored",
    };
    assert_eq!(name, expected);
}

#[then(expr = "order {word} has status {word}")]
async fn order_status(world: &mut ReconciliationWorld, order_id: String, status: String) {
    let expected = status.parse::<OrderStatusType>().expect("Invalid status");
    let order = world.api().fetch_order(&OrderId::from(order_id)).await.unwrap().expect("Order does not exist");
    assert_eq!(order.status, expected);
}

#[then(expr = "order {word} records payment {word}")]
async fn order_payment(world: &mut ReconciliationWorld, order_id: String, payment_id: String) {
    let order = world.api().fetch_order(&OrderId::from(order_id)).await.unwrap().expect("Order does not exist");
    assert_eq!(order.payment_id.as_deref(), Some(payment_id.as_str()));
}

#[then(expr = "the store holds {int} order(s)")]
async fn order_count(world: &mut ReconciliationWorld, count: usize) {
    assert_eq!(world.api().db().order_count().await.unwrap(), count);
}

#[then(expr = "the merchant has been notified {int} time(s)")]
async fn notified_count(world: &mut ReconciliationWorld, count: usize) {
    // Notifications are delivered on a separate task
    for _ in 0..20 {
        if world.system().notification_count() >= count {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    // Give any unexpected extra notification a chance to show up
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(world.system().notification_count(), count);
}

#[then(expr = "the merchant was notified about order {word} with payment {word}")]
async fn notified_about(world: &mut ReconciliationWorld, order_id: String, payment_id: String) {
    let log = world.system().notifications.lock().unwrap().clone();
    assert!(log.contains(&(order_id, payment_id)), "Notification log: {log:?}");
}
