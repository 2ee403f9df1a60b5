use actix_web::{
    http::{Method, StatusCode},
    test::TestRequest,
};
use razorpay_payment_engine::{
    db_types::{CartItem, OrderStatusType},
    events::EventProducers,
    traits::{GatewayOrder, OrderGatewayError, OrderStore},
    InMemoryOrderStore,
};
use serde_json::{json, Value};

use super::{
    helpers::{call_stateless, post_order},
    mocks::MockOrderGateway,
};

const CHECKOUT_BODY: &str = r#"{
    "amount": 1200,
    "customer": {"name": "Asha Rao", "mobile": "+919800000000", "address": "12 MG Road, Bengaluru 560001"},
    "cartItems": [{"name": "Cold-pressed groundnut oil 1L", "qty": 2}, {"name": "A2 cow ghee 500ml", "qty": 1}]
}"#;

fn gateway_order_json(order_id: &str, amount: i64, receipt: &str) -> Value {
    json!({
        "id": order_id,
        "entity": "order",
        "amount": amount,
        "amount_paid": 0,
        "amount_due": amount,
        "currency": "INR",
        "receipt": receipt,
        "status": "created",
        "attempts": 0,
        "notes": [],
        "created_at": 1_700_000_000
    })
}

#[actix_web::test]
async fn create_order() {
    let _ = env_logger::try_init().ok();
    let store = InMemoryOrderStore::new();
    let mut gateway = MockOrderGateway::new();
    gateway.expect_create_gateway_order().times(1).returning(|req| {
        assert_eq!(req.amount, 120_000);
        assert_eq!(req.currency, "INR");
        assert!(req.receipt.starts_with("rpg_receipt_"), "Unexpected receipt {}", req.receipt);
        Ok(GatewayOrder {
            order_id: "order_T1".into(),
            raw: gateway_order_json("order_T1", req.amount, &req.receipt),
        })
    });
    let (status, body) = post_order(&store, &EventProducers::default(), gateway, CHECKOUT_BODY).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["id"], "order_T1");
    assert_eq!(body["amount"], 120_000);
    assert_eq!(body["status"], "created");

    let order = store.fetch_order_by_order_id(&"order_T1".into()).await.unwrap().expect("Order was not stored");
    assert_eq!(order.status, OrderStatusType::Pending);
    assert_eq!(order.amount.minor_units(), 120_000);
    assert_eq!(order.currency, "INR");
    assert_eq!(order.receipt, body["receipt"].as_str().unwrap());
    assert_eq!(order.customer.mobile, "+919800000000");
    assert_eq!(order.cart_items[1], CartItem::new("A2 cow ghee 500ml", 1));
    assert!(order.payment_id.is_none());
}

#[actix_web::test]
async fn amounts_are_rounded_to_minor_units() {
    let store = InMemoryOrderStore::new();
    let mut gateway = MockOrderGateway::new();
    gateway.expect_create_gateway_order().times(1).returning(|req| {
        assert_eq!(req.amount, 24_990);
        Ok(GatewayOrder { order_id: "order_T2".into(), raw: gateway_order_json("order_T2", req.amount, &req.receipt) })
    });
    let body = r#"{"amount": "249.899", "customer": {"name": "A"}, "cartItems": []}"#;
    let (status, _) = post_order(&store, &EventProducers::default(), gateway, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.order_count().await.unwrap(), 1);
}

#[actix_web::test]
async fn invalid_order_data() {
    let _ = env_logger::try_init().ok();
    let bodies = [
        r#"{"customer": {"name": "A"}, "cartItems": []}"#,
        r#"{"amount": 0, "customer": {"name": "A"}, "cartItems": []}"#,
        r#"{"amount": -250, "customer": {"name": "A"}, "cartItems": []}"#,
        r#"{"amount": "abc", "customer": {"name": "A"}, "cartItems": []}"#,
        r#"{"amount": 500, "cartItems": []}"#,
        r#"{"amount": 500, "customer": {"name": "A"}}"#,
        r#"{"amount": 500, "customer": {"name": "A"}, "cartItems": null}"#,
        r#"not json at all"#,
    ];
    for body in bodies {
        let store = InMemoryOrderStore::new();
        let mut gateway = MockOrderGateway::new();
        gateway.expect_create_gateway_order().never();
        let (status, response) = post_order(&store, &EventProducers::default(), gateway, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(response.starts_with(r#"{"error":"Invalid order data."#), "{body} => {response}");
        assert_eq!(store.order_count().await.unwrap(), 0);
    }
}

#[actix_web::test]
async fn gateway_failure() {
    let _ = env_logger::try_init().ok();
    let store = InMemoryOrderStore::new();
    let mut gateway = MockOrderGateway::new();
    gateway
        .expect_create_gateway_order()
        .times(1)
        .returning(|_| Err(OrderGatewayError::Rejected("Error 401. Authentication failed".into())));
    let (status, body) = post_order(&store, &EventProducers::default(), gateway, CHECKOUT_BODY).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"error":"Order creation failed."}"#);
    assert_eq!(store.order_count().await.unwrap(), 0);
}

#[actix_web::test]
async fn cors_preflight() {
    let req = TestRequest::default().method(Method::OPTIONS).uri("/create-order");
    let (status, _) = call_stateless(req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn banner_and_health() {
    let (status, body) = call_stateless(TestRequest::get().uri("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("is running"));
    let (status, body) = call_stateless(TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}
