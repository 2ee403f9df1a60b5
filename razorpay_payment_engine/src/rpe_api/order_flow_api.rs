use std::fmt::Debug;

use chrono::{Duration, Utc};
use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType},
    events::{EventProducers, OrderPaidEvent},
    order_objects::WebhookOutcome,
    traits::{OrderStore, OrderStoreError},
    webhook_objects::{PaymentEntity, WebhookEvent, WebhookEventKind},
};

/// `OrderFlowApi` is the primary API for handling order flows in response to order creation requests and payment
/// gateway notifications.
///
/// It must only be handed events whose signature has already been verified.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: OrderStore
{
    /// Records an order that the payment gateway has just created. The order starts in the `Pending` state.
    ///
    /// Re-submitting identical details is harmless. If an order with the same id but different details exists, an
    /// [`OrderStoreError::OrderAlreadyExists`] error is returned and the stored order is left as it was.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, OrderStoreError> {
        let oid = order.order_id.clone();
        let (order, inserted) = self.db.insert_order(order).await?;
        if inserted {
            info!("🔄️📦️ Order {oid} created for {} {}", order.amount, order.currency);
        } else {
            info!("🔄️📦️ Order {oid} was submitted again with identical details");
        }
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        self.db.fetch_order_by_order_id(order_id).await
    }

    /// Applies an authenticated gateway notification to the order store.
    ///
    /// Only `payment.captured` events have an effect. An error is returned only if the store itself fails; business
    /// outcomes are reported through [`WebhookOutcome`].
    pub async fn process_webhook_event(&self, event: WebhookEvent) -> Result<WebhookOutcome, OrderStoreError> {
        match event.kind {
            WebhookEventKind::PaymentCaptured(payment) => self.process_payment_captured(&payment).await,
            WebhookEventKind::Other(event_type) => {
                debug!("🔄️📨️ Ignoring '{event_type}' event");
                Ok(WebhookOutcome::Ignored(event_type))
            },
        }
    }

    /// Marks the order referenced by `payment` as paid.
    ///
    /// The check-and-set happens atomically in the store, so for any number of (possibly concurrent) deliveries of
    /// the same capture, exactly one call returns [`WebhookOutcome::OrderPaid`] and only that call publishes an
    /// [`OrderPaidEvent`]. The event is published after the store has committed the transition and released its
    /// lock.
    pub async fn process_payment_captured(&self, payment: &PaymentEntity) -> Result<WebhookOutcome, OrderStoreError> {
        let oid = &payment.order_id;
        trace!("🔄️💰️ Payment {} captured for order {oid}", payment.id);
        let transition = match self.db.mark_order_as_paid(oid, &payment.id).await {
            Ok(t) => t,
            Err(OrderStoreError::OrderNotFound(_)) => {
                warn!("🔄️💰️ Payment {} was captured for order {oid}, but the order does not exist.", payment.id);
                return Ok(WebhookOutcome::UnknownOrder(oid.clone()));
            },
            Err(e) => return Err(e),
        };
        if !transition.is_new_payment() {
            info!(
                "🔄️💰️ Order {oid} is already paid (by {}). Ignoring duplicate capture {}",
                transition.order.payment_id.as_deref().unwrap_or("unknown payment"),
                payment.id
            );
            return Ok(WebhookOutcome::AlreadyPaid(oid.clone()));
        }
        if let Some(captured) = payment.amount {
            let amount = transition.order.amount.minor_units();
            if captured != amount {
                warn!(
                    "🔄️💰️ Captured amount for order {oid} ({captured}) differs from the order total ({amount}). The \
                     order has been marked as paid, but check this payment manually."
                );
            }
        }
        info!("🔄️💰️ Order {oid} is paid. Payment id: {}", payment.id);
        self.call_order_paid_hook(&transition.order, &payment.id).await;
        Ok(WebhookOutcome::OrderPaid(transition.order))
    }

    /// Returns the `Pending` orders created more than `older_than` ago. Nothing ever expires these orders, so operators
    /// rely on this to spot checkouts that were abandoned, or captures that were never delivered.
    pub async fn fetch_stale_pending_orders(&self, older_than: Duration) -> Result<Vec<Order>, OrderStoreError> {
        let cutoff = Utc::now() - older_than;
        let pending = self.db.fetch_orders_with_status(OrderStatusType::Pending).await?;
        Ok(pending.into_iter().filter(|o| o.created_at < cutoff).collect())
    }

    async fn call_order_paid_hook(&self, order: &Order, payment_id: &str) {
        for emitter in &self.producers.order_paid_producer {
            debug!("🔄️📦️ Notifying order paid hook subscribers");
            let event = OrderPaidEvent::new(order.clone(), payment_id.to_string());
            emitter.publish_event(event).await;
        }
    }
}
