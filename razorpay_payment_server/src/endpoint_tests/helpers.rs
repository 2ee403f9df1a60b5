use std::{sync::Arc, time::Duration};

use actix_web::{
    body::to_bytes,
    http::{header::ContentType, StatusCode},
    test,
    test::TestRequest,
    web,
    App,
    HttpResponse,
};
use anyhow::anyhow;
use razorpay_payment_engine::{
    events::{EventHandlers, EventProducers},
    test_utils::fixtures::TEST_WEBHOOK_SECRET,
    InMemoryOrderStore,
    OrderFlowApi,
};
use rpg_common::Secret;

use super::mocks::{MockOrderGateway, RecordingNotifier};
use crate::{
    config::{ServerOptions, WebhookConfig},
    middleware::RAZORPAY_SIGNATURE_HEADER,
    notifier::order_paid_hooks,
    routes::{banner, health},
    server::{json_config, order_routes, webhook_scope},
};

/// Starts the order-paid hook for `notifier` and returns the producers to hand to the API.
pub fn start_notifications(notifier: RecordingNotifier) -> EventProducers {
    let handlers = EventHandlers::new(16, order_paid_hooks(Arc::new(notifier)));
    let producers = handlers.producers();
    let _ = handlers.start_handlers();
    producers
}

/// Waits until `notifier` has recorded `expected` notifications, then a little longer to catch any extra ones.
pub async fn settle_notifications(notifier: &RecordingNotifier, expected: usize) -> Vec<String> {
    for _ in 0..100 {
        if notifier.sent().len() >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    notifier.sent()
}

pub fn webhook_config(hmac_checks: bool) -> WebhookConfig {
    WebhookConfig { secret: Secret::new(TEST_WEBHOOK_SECRET.to_string()), hmac_checks }
}

/// Sends `body` to the webhook route, with the given signature header, if any.
pub async fn post_webhook(
    store: &InMemoryOrderStore,
    producers: &EventProducers,
    config: WebhookConfig,
    body: Vec<u8>,
    signature: Option<&str>,
) -> (StatusCode, String) {
    let app = App::new()
        .app_data(web::Data::new(OrderFlowApi::new(store.clone(), producers.clone())))
        .service(webhook_scope::<InMemoryOrderStore>(config));
    let service = test::init_service(app).await;
    let mut req = TestRequest::post().uri("/razorpay-webhook").insert_header(ContentType::json()).set_payload(body);
    if let Some(signature) = signature {
        req = req.insert_header((RAZORPAY_SIGNATURE_HEADER, signature));
    }
    let res = match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => res.into_parts().1,
        Err(e) => e.error_response(),
    };
    let status = res.status();
    let body = body_string(res).await.expect("Could not read response body");
    (status, body)
}

/// Sends `body` to the order creation route, using `gateway` to open orders.
pub async fn post_order(
    store: &InMemoryOrderStore,
    producers: &EventProducers,
    gateway: MockOrderGateway,
    body: &str,
) -> (StatusCode, String) {
    let app = App::new()
        .app_data(web::Data::new(OrderFlowApi::new(store.clone(), producers.clone())))
        .app_data(web::Data::new(gateway))
        .app_data(web::Data::new(ServerOptions::default()))
        .app_data(json_config())
        .configure(order_routes::<InMemoryOrderStore, MockOrderGateway>);
    let service = test::init_service(app).await;
    let req = TestRequest::post()
        .uri("/create-order")
        .insert_header(ContentType::json())
        .set_payload(body.to_string())
        .to_request();
    let res = match test::try_call_service(&service, req).await {
        Ok(res) => res.into_parts().1,
        Err(e) => e.error_response(),
    };
    let status = res.status();
    let body = body_string(res).await.expect("Could not read response body");
    (status, body)
}

/// Issues a request against the routes that need no state.
pub async fn call_stateless(req: TestRequest) -> (StatusCode, String) {
    let app = App::new()
        .service(banner)
        .service(health)
        .configure(order_routes::<InMemoryOrderStore, MockOrderGateway>);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await.into_parts().1;
    let status = res.status();
    let body = body_string(res).await.expect("Could not read response body");
    (status, body)
}

pub async fn body_string(res: HttpResponse) -> anyhow::Result<String> {
    let bytes = to_bytes(res.into_body()).await.map_err(|e| anyhow!("Could not read response body. {e}"))?;
    Ok(String::from_utf8(bytes.to_vec())?)
}
