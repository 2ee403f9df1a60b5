use chrono::Duration;
use log::*;
use razorpay_payment_engine::{db_types::Order, events::EventProducers, InMemoryOrderStore, OrderFlowApi};
use tokio::task::JoinHandle;

/// Starts the stale order reporter. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Every `interval`, the reporter logs the orders that have been `Pending` for longer than `max_age`. It only reports:
/// orders are never expired or removed. Returns `None` if `interval` is zero, which disables the reporter.
pub fn start_stale_order_worker(
    db: InMemoryOrderStore,
    interval: Duration,
    max_age: Duration,
) -> Option<JoinHandle<()>> {
    let period = match interval.to_std() {
        Ok(p) if !p.is_zero() => p,
        _ => {
            info!("🕰️ Stale order reporter is disabled");
            return None;
        },
    };
    let handle = tokio::spawn(async move {
        let mut timer = tokio::time::interval(period);
        let api = OrderFlowApi::new(db, EventProducers::default());
        info!("🕰️ Stale order reporter started");
        // The first tick completes immediately, and there's nothing to report at startup
        timer.tick().await;
        loop {
            timer.tick().await;
            trace!("🕰️ Running stale order report");
            match api.fetch_stale_pending_orders(max_age).await {
                Ok(orders) if orders.is_empty() => debug!("🕰️ No stale orders"),
                Ok(orders) => {
                    warn!(
                        "🕰️ {} orders have been waiting for payment for more than {} hours: {}",
                        orders.len(),
                        max_age.num_hours(),
                        order_list(&orders)
                    );
                },
                Err(e) => {
                    error!("🕰️ Error running stale order report: {e}");
                },
            }
        }
    });
    Some(handle)
}

fn order_list(orders: &[Order]) -> String {
    orders
        .iter()
        .map(|o| format!("order_id: {} receipt: {} created: {}", o.order_id, o.receipt, o.created_at))
        .collect::<Vec<String>>()
        .join(", ")
}
