//! Data objects for notifications sent by the payment gateway.
//!
//! A notification has the envelope
//! ```json
//! {
//!   "entity": "event",
//!   "account_id": "acc_...",
//!   "event": "payment.captured",
//!   "contains": ["payment"],
//!   "payload": { "payment": { "entity": { "id": "pay_...", "order_id": "order_...", ... } } },
//!   "created_at": 1700000000
//! }
//! ```
//! Only `payment.captured` is interpreted. Every other event type is carried through as [`WebhookEventKind::Other`]
//! so that new event types added by the gateway are acknowledged rather than rejected.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db_types::OrderId;

pub const PAYMENT_CAPTURED: &str = "payment.captured";

#[derive(Debug, Clone, Error)]
pub enum WebhookParseError {
    #[error("Webhook body is not a valid event envelope. {0}")]
    InvalidEnvelope(String),
    #[error("Webhook '{event}' has an invalid payload. {reason}")]
    InvalidPayload { event: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
struct RawWebhookEvent {
    event: String,
    #[serde(default)]
    account_id: Option<String>,
    #[serde(default)]
    created_at: Option<i64>,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct EntityWrapper<T> {
    entity: T,
}

#[derive(Debug, Clone, Deserialize)]
struct PaymentPayload {
    payment: EntityWrapper<PaymentEntity>,
}

/// The subset of the gateway's payment entity that the reconciler uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntity {
    /// The gateway payment id, e.g. `pay_29QQoUBi66xm2f`
    pub id: String,
    pub order_id: OrderId,
    /// Captured amount, in minor units
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventKind {
    PaymentCaptured(PaymentEntity),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    pub kind: WebhookEventKind,
    pub account_id: Option<String>,
    pub created_at: Option<i64>,
}

impl WebhookEvent {
    /// Parses a notification from the raw, already-authenticated request body.
    pub fn from_slice(raw: &[u8]) -> Result<Self, WebhookParseError> {
        let raw_event = serde_json::from_slice::<RawWebhookEvent>(raw)
            .map_err(|e| WebhookParseError::InvalidEnvelope(e.to_string()))?;
        let kind = match raw_event.event.as_str() {
            PAYMENT_CAPTURED => {
                let payload = serde_json::from_value::<PaymentPayload>(raw_event.payload).map_err(|e| {
                    WebhookParseError::InvalidPayload { event: raw_event.event.clone(), reason: e.to_string() }
                })?;
                let payment = payload.payment.entity;
                if payment.id.is_empty() || payment.order_id.as_str().is_empty() {
                    return Err(WebhookParseError::InvalidPayload {
                        event: raw_event.event,
                        reason: "payment id and order id must not be empty".to_string(),
                    });
                }
                WebhookEventKind::PaymentCaptured(payment)
            },
            _ => WebhookEventKind::Other(raw_event.event),
        };
        Ok(Self { kind, account_id: raw_event.account_id, created_at: raw_event.created_at })
    }

    pub fn event_type(&self) -> &str {
        match &self.kind {
            WebhookEventKind::PaymentCaptured(_) => PAYMENT_CAPTURED,
            WebhookEventKind::Other(s) => s.as_str(),
        }
    }
}
