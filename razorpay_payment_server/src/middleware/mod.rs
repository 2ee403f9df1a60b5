mod hmac;

pub use hmac::{HmacMiddlewareFactory, HmacMiddlewareService, RAZORPAY_SIGNATURE_HEADER};
