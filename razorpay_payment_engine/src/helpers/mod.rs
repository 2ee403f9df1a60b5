mod webhook_signature;

pub use webhook_signature::{calculate_hmac, verify_signature};
