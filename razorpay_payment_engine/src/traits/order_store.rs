use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderId, OrderStatusType};

/// The result of a status change request. `previous` is the status the order had when the per-order lock was taken,
/// so callers can tell whether *they* performed the transition.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub previous: OrderStatusType,
    pub order: Order,
}

impl StatusTransition {
    /// True if this call moved the order from `Pending` to `Paid`.
    pub fn is_new_payment(&self) -> bool {
        self.previous == OrderStatusType::Pending && self.order.status == OrderStatusType::Paid
    }
}

/// This trait defines the storage behaviour the reconciliation flow depends on.
///
/// Implementations must guarantee that [`OrderStore::mark_order_as_paid`] is atomic per `order_id`: when the same
/// capture event is delivered concurrently, exactly one caller observes `previous == Pending`. Calls for different
/// order ids must not serialise each other.
#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone {
    /// Stores a new order in the `Pending` state.
    ///
    /// This call is idempotent for identical resubmissions. Returns the stored order and `true` if it was inserted, or
    /// `false` if an identical order already existed. An order with the same id but different details is rejected
    /// with [`OrderStoreError::OrderAlreadyExists`]; the stored order is never overwritten.
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderStoreError>;

    /// Fetches a snapshot of the order with the given id, if it exists.
    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Atomically transitions the order from `Pending` to `Paid`, recording `payment_id`.
    ///
    /// If the order is already `Paid`, nothing is changed (including the recorded payment id) and the returned
    /// transition has `previous == Paid`. If the order does not exist, [`OrderStoreError::OrderNotFound`] is returned.
    async fn mark_order_as_paid(
        &self,
        order_id: &OrderId,
        payment_id: &str,
    ) -> Result<StatusTransition, OrderStoreError>;

    /// Fetches snapshots of all orders currently in the given status.
    async fn fetch_orders_with_status(&self, status: OrderStatusType) -> Result<Vec<Order>, OrderStoreError>;

    /// The number of orders held by the store.
    async fn order_count(&self) -> Result<usize, OrderStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Order {0} already exists with different details.")]
    OrderAlreadyExists(OrderId),
    #[error("Order {0} does not exist.")]
    OrderNotFound(OrderId),
}
