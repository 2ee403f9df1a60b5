use std::sync::{Arc, Mutex};

use cucumber::World;
use log::*;
use razorpay_payment_engine::{
    events::{EventHandlers, EventHooks},
    helpers::verify_signature,
    test_utils::fixtures::TEST_WEBHOOK_SECRET,
    webhook_objects::WebhookEvent,
    InMemoryOrderStore,
    OrderFlowApi,
    WebhookOutcome,
};

/// (order id, payment id) pairs, in the order the merchant was notified
pub type NotificationLog = Arc<Mutex<Vec<(String, String)>>>;

#[derive(Default, Debug, World)]
pub struct ReconciliationWorld {
    pub system: Option<ReconciliationSystem>,
    pub last_delivery: Option<Result<WebhookOutcome, String>>,
}

#[derive(Debug)]
pub struct ReconciliationSystem {
    pub api: OrderFlowApi<InMemoryOrderStore>,
    pub notifications: NotificationLog,
}

impl ReconciliationWorld {
    pub fn system(&self) -> &ReconciliationSystem {
        self.system.as_ref().expect("Order system not initialised")
    }

    pub fn api(&self) -> &OrderFlowApi<InMemoryOrderStore> {
        &self.system().api
    }
}

impl ReconciliationSystem {
    pub fn new() -> Self {
        let notifications = NotificationLog::default();
        let log = Arc::clone(&notifications);
        let mut hooks = EventHooks::default();
        hooks.on_order_paid(move |ev| {
            let log = Arc::clone(&log);
            Box::pin(async move {
                debug!("📧️ Merchant notified of {} ({})", ev.order.order_id, ev.payment_id);
                log.lock().unwrap().push((ev.order.order_id.0.clone(), ev.payment_id));
            })
        });
        let handlers = EventHandlers::new(10, hooks);
        let api = OrderFlowApi::new(InMemoryOrderStore::new(), handlers.producers());
        let _ = handlers.start_handlers();
        Self { api, notifications }
    }

    /// Runs a notification through the same sequence as the webhook endpoint: authenticate the raw bytes, parse those
    /// bytes, reconcile.
    pub async fn deliver(&self, body: &[u8], signature: &str) -> Result<WebhookOutcome, String> {
        if !verify_signature(body, signature, TEST_WEBHOOK_SECRET.as_bytes()) {
            return Err("rejected".to_string());
        }
        let event = WebhookEvent::from_slice(body).map_err(|_| "rejected".to_string())?;
        self.api.process_webhook_event(event).await.map_err(|e| e.to_string())
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}
