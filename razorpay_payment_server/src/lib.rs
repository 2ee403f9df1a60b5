//! # RPG server
//! This module hosts the server code for the Razorpay payment gateway backend. It is responsible for:
//! Opening orders on the payment gateway on behalf of the storefront checkout.
//! Listening for incoming webhook requests from the payment gateway, and authenticating them.
//! Handing authenticated payment notifications to the reconciler, which marks orders as paid.
//! Notifying the merchant when an order has been paid.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/`: A banner, so that a browser pointed at the server shows something.
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/create-order`: Opens an order on the payment gateway and records it as `Pending`.
//! * `/razorpay-webhook`: The webhook route for receiving signed payment notifications.
//!
//! ## Limitations
//! Orders are held in memory. They are lost when the server restarts, and orders that are never paid are kept until
//! then.

pub mod cli;
pub mod config;
pub mod errors;

pub mod data_objects;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod notifier;
pub mod routes;
pub mod server;
pub mod stale_order_worker;

#[cfg(test)]
mod endpoint_tests;
