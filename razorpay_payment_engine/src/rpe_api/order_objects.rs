use std::fmt::Display;

use crate::db_types::{Order, OrderId};

/// What the reconciler did with an authenticated notification.
///
/// Every variant is a successfully handled notification from the gateway's point of view. Conditions that a retry
/// cannot fix (unknown orders, replays, event types this integration doesn't use) are reported here rather than as
/// errors, so that they never trigger the gateway's retry policy.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// The order moved from `Pending` to `Paid` as a result of this notification.
    OrderPaid(Order),
    /// The order was already `Paid`. Nothing was changed.
    AlreadyPaid(OrderId),
    /// The notification refers to an order this system has no record of.
    UnknownOrder(OrderId),
    /// The event type is not one this integration reacts to.
    Ignored(String),
}

impl WebhookOutcome {
    pub fn is_new_payment(&self) -> bool {
        matches!(self, Self::OrderPaid(_))
    }
}

impl Display for WebhookOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrderPaid(order) => write!(f, "Order {} marked as paid.", order.order_id),
            Self::AlreadyPaid(oid) => write!(f, "Order {oid} was already paid."),
            Self::UnknownOrder(oid) => write!(f, "Order {oid} not found."),
            Self::Ignored(event) => write!(f, "Event '{event}' ignored."),
        }
    }
}
