use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use mockall::mock;
use razorpay_payment_engine::{
    db_types::Order,
    traits::{GatewayOrder, GatewayOrderRequest, OrderGateway, OrderGatewayError},
};

use crate::notifier::{NotifierError, OrderNotifier};

mock! {
    pub OrderGateway {}
    impl OrderGateway for OrderGateway {
        async fn create_gateway_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, OrderGatewayError>;
    }
}

/// Records the payment id of every order it is asked to notify about. If `fail` is set, every notification fails
/// after being recorded.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl OrderNotifier for RecordingNotifier {
    fn notify_order_paid<'a>(
        &'a self,
        _order: &'a Order,
        payment_id: &'a str,
    ) -> BoxFuture<'a, Result<(), NotifierError>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(payment_id.to_string());
            if self.fail {
                Err(NotifierError::Unavailable("mail relay is down".into()))
            } else {
                Ok(())
            }
        })
    }
}
