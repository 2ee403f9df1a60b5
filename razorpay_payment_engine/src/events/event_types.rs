use crate::db_types::Order;

/// Emitted exactly once per order, after the order has been committed as `Paid`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPaidEvent {
    /// Snapshot of the order immediately after the transition
    pub order: Order,
    /// The gateway payment id that paid for the order
    pub payment_id: String,
}

impl OrderPaidEvent {
    pub fn new(order: Order, payment_id: String) -> Self {
        Self { order, payment_id }
    }
}
