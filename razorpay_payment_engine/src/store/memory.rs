//! Volatile order storage.
//!
//! Orders are kept in a map of per-order mutexes. The map lock is only held long enough to find (or insert) the entry
//! for an order id; the status check and update happen under that order's own mutex. This means that concurrent
//! capture notifications for one order are serialised, while notifications for different orders never wait on each
//! other.
//!
//! Everything is lost when the process exits.
use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use log::*;
use parking_lot::{Mutex, RwLock};

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType},
    traits::{OrderStore, OrderStoreError, StatusTransition},
};

#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Arc<Mutex<Order>>>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, order_id: &OrderId) -> Option<Arc<Mutex<Order>>> {
        self.orders.read().get(order_id).cloned()
    }
}

impl std::fmt::Debug for InMemoryOrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InMemoryOrderStore ({} orders)", self.orders.read().len())
    }
}

impl OrderStore for InMemoryOrderStore {
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderStoreError> {
        let mut orders = self.orders.write();
        if let Some(existing) = orders.get(&order.order_id) {
            let existing = existing.lock().clone();
            return if order.is_equivalent(&existing) {
                debug!("🗃️ Order {} already exists with identical details", order.order_id);
                Ok((existing, false))
            } else {
                warn!("🗃️ Refusing to overwrite order {} with different details", order.order_id);
                Err(OrderStoreError::OrderAlreadyExists(order.order_id))
            };
        }
        let order = Order::from(order);
        orders.insert(order.order_id.clone(), Arc::new(Mutex::new(order.clone())));
        trace!("🗃️ Order {} stored. {} orders in store", order.order_id, orders.len());
        Ok((order, true))
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        Ok(self.entry(order_id).map(|o| o.lock().clone()))
    }

    async fn mark_order_as_paid(
        &self,
        order_id: &OrderId,
        payment_id: &str,
    ) -> Result<StatusTransition, OrderStoreError> {
        let entry = self.entry(order_id).ok_or_else(|| OrderStoreError::OrderNotFound(order_id.clone()))?;
        let mut order = entry.lock();
        let previous = order.status;
        match previous {
            OrderStatusType::Pending => {
                order.status = OrderStatusType::Paid;
                order.payment_id = Some(payment_id.to_string());
                order.updated_at = Utc::now();
                trace!("🗃️ Order {order_id} marked as paid by {payment_id}");
            },
            OrderStatusType::Paid => {
                trace!("🗃️ Order {order_id} is already paid. Ignoring payment {payment_id}");
            },
        }
        Ok(StatusTransition { previous, order: order.clone() })
    }

    async fn fetch_orders_with_status(&self, status: OrderStatusType) -> Result<Vec<Order>, OrderStoreError> {
        let entries = self.orders.read().values().cloned().collect::<Vec<_>>();
        let mut result = entries
            .iter()
            .map(|e| e.lock().clone())
            .filter(|o| o.status == status)
            .collect::<Vec<Order>>();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    async fn order_count(&self) -> Result<usize, OrderStoreError> {
        Ok(self.orders.read().len())
    }
}
