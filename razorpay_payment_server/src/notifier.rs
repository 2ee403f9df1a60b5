//! Merchant notifications
//!
//! When an order is paid, the merchant is sent a plain-text summary of it. Notifications are dispatched from an
//! order-paid event hook, so they run on their own task after the order has been committed as paid. A failed
//! notification is logged and then forgotten: it never changes the order, nor the response sent to the gateway.
use std::{fmt::Write, sync::Arc, time::Duration};

use futures::future::BoxFuture;
use log::*;
use razorpay_payment_engine::{db_types::Order, events::EventHooks};
use reqwest::Client;
use rpg_common::Secret;
use serde::Serialize;
use thiserror::Error;

use crate::{config::NotifierConfig, helpers::currency_symbol};

const RELAY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Could not initialize the notifier. {0}")]
    Initialization(String),
    #[error("Could not reach the mail relay. {0}")]
    Unavailable(String),
    #[error("The mail relay rejected the message. Error {status}. {message}")]
    Rejected { status: u16, message: String },
}

/// Something that can tell the merchant about a paid order.
pub trait OrderNotifier: Send + Sync {
    fn notify_order_paid<'a>(
        &'a self,
        order: &'a Order,
        payment_id: &'a str,
    ) -> BoxFuture<'a, Result<(), NotifierError>>;
}

/// Builds the plain-text order summary that is sent to the merchant.
pub fn format_order_summary(order: &Order, payment_id: &str) -> String {
    let mut items = String::new();
    for item in &order.cart_items {
        let _ = writeln!(items, "• {} × {}", item.name, item.qty);
    }
    format!(
        "🛒 NEW ORDER RECEIVED\n\nCustomer Name: {}\nMobile: {}\nAddress: {}\n\nItems:\n{items}\nTotal Paid: \
         {}{}\nPayment ID: {payment_id}\n",
        order.customer.name,
        order.customer.mobile,
        order.customer.address,
        currency_symbol(&order.currency),
        order.amount
    )
}

/// Creates the order-paid hook that hands every newly paid order to `notifier`.
pub fn order_paid_hooks(notifier: Arc<dyn OrderNotifier>) -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_order_paid(move |ev| {
        let notifier = Arc::clone(&notifier);
        Box::pin(async move {
            let oid = &ev.order.order_id;
            match notifier.notify_order_paid(&ev.order, &ev.payment_id).await {
                Ok(()) => info!("📧️ Merchant notified about order {oid}"),
                Err(e) => error!(
                    "📧️ Could not notify the merchant that order {oid} was paid (payment {}). The order IS paid. \
                     Follow this one up manually. {e}",
                    ev.payment_id
                ),
            }
        })
    });
    hooks
}

/// Returns the notifier described by `config`: a [`MailRelayNotifier`] if a relay is configured, a [`LogNotifier`]
/// otherwise.
pub fn create_notifier(config: &NotifierConfig) -> Result<Arc<dyn OrderNotifier>, NotifierError> {
    match MailRelayNotifier::from_config(config)? {
        Some(relay) => Ok(Arc::new(relay)),
        None => Ok(Arc::new(LogNotifier)),
    }
}

//--------------------------------------      MailRelayNotifier      ---------------------------------------------------
#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

/// Sends order summaries through an HTTP mail relay, which accepts `{from, to, subject, text}` as JSON.
#[derive(Clone)]
pub struct MailRelayNotifier {
    client: Client,
    url: String,
    token: Secret<String>,
    from: String,
    to: String,
    subject: String,
}

impl MailRelayNotifier {
    /// Returns `None` if no relay URL is configured.
    pub fn from_config(config: &NotifierConfig) -> Result<Option<Self>, NotifierError> {
        let url = match &config.relay_url {
            Some(url) => url.clone(),
            None => return Ok(None),
        };
        let client = Client::builder()
            .timeout(RELAY_TIMEOUT)
            .build()
            .map_err(|e| NotifierError::Initialization(e.to_string()))?;
        Ok(Some(Self {
            client,
            url,
            token: config.relay_token.clone(),
            from: config.from.clone(),
            to: config.to.clone(),
            subject: config.subject.clone(),
        }))
    }

    async fn send(&self, text: String) -> Result<(), NotifierError> {
        let message = RelayMessage { from: &self.from, to: &self.to, subject: &self.subject, text };
        let mut req = self.client.post(&self.url).json(&message);
        if !self.token.is_empty() {
            req = req.bearer_auth(self.token.reveal());
        }
        trace!("📧️ Sending order mail to {} via {}", self.to, self.url);
        let response = req.send().await.map_err(|e| NotifierError::Unavailable(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(NotifierError::Rejected { status: status.as_u16(), message })
        }
    }
}

impl OrderNotifier for MailRelayNotifier {
    fn notify_order_paid<'a>(
        &'a self,
        order: &'a Order,
        payment_id: &'a str,
    ) -> BoxFuture<'a, Result<(), NotifierError>> {
        Box::pin(self.send(format_order_summary(order, payment_id)))
    }
}

//--------------------------------------         LogNotifier         ---------------------------------------------------
/// Writes order summaries to the log. Used when no mail relay has been configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl OrderNotifier for LogNotifier {
    fn notify_order_paid<'a>(
        &'a self,
        order: &'a Order,
        payment_id: &'a str,
    ) -> BoxFuture<'a, Result<(), NotifierError>> {
        Box::pin(async move {
            let summary = format_order_summary(order, payment_id);
            info!("📧️ No mail relay is configured. Order summary follows.\n{summary}");
            Ok(())
        })
    }
}
