//! Razorpay Payment Engine
//!
//! This library contains the logic that turns payment gateway notifications into order state changes. It is
//! independent of the HTTP layer.
//!
//! The library is divided into three main sections:
//! 1. Order storage ([`traits::OrderStore`]). Orders live in an [`InMemoryOrderStore`] for the lifetime of the process.
//!    Nothing is persisted: a restart forgets every order, and `Pending` orders that never receive a capture event are
//!    kept until then. Backends only need to implement the [`traits::OrderStore`] trait to replace it.
//! 2. Webhook authentication ([`helpers::verify_signature`]) and parsing ([`webhook_objects`]). The signature is always
//!    checked against the exact bytes received, and only then are those same bytes parsed.
//! 3. The reconciliation API ([`OrderFlowApi`]), which applies a verified event to the order store.
//!
//! The engine also provides a set of events that can be subscribed to. When an order transitions to `Paid`, an
//! `OrderPaidEvent` is emitted after the state change has been committed. The server uses this hook to notify the
//! merchant.
pub mod db_types;
pub mod events;
pub mod helpers;
mod rpe_api;
mod store;
pub mod traits;
pub mod webhook_objects;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use rpe_api::{
    order_flow_api::OrderFlowApi,
    order_objects::{self, WebhookOutcome},
};
pub use store::InMemoryOrderStore;
pub use traits::{OrderGateway, OrderGatewayError, OrderStore, OrderStoreError, StatusTransition};
