//! Webhook signature verification.
//!
//! The gateway signs every notification with HMAC-SHA256 over the raw request body, keyed with the webhook secret
//! configured in the gateway dashboard, and sends the lowercase hex digest in the `X-Razorpay-Signature` header.
//!
//! Verification must be performed on the bytes exactly as they were received. Parsing the body and re-serializing it
//! does not reproduce the signed bytes in general, so [`verify_signature`] takes `&[u8]` and callers are expected to
//! parse only after it returns `true`.
use hmac::{Hmac, Mac};
use log::trace;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Calculates the HMAC-SHA256 of `data` keyed with `secret`, as a lowercase hex string.
pub fn calculate_hmac(secret: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take a key of any size");
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}

/// Returns true iff `provided_signature` is exactly the lowercase hex HMAC-SHA256 digest of `raw_body` under `secret`.
///
/// The comparison runs in constant time with respect to the contents of the signature. Any textual variation of the
/// correct digest (upper case, surrounding whitespace, a `sha256=` prefix) is treated as a mismatch. An empty secret
/// never verifies anything.
pub fn verify_signature(raw_body: &[u8], provided_signature: &str, secret: &[u8]) -> bool {
    if secret.is_empty() {
        trace!("🔐️ No webhook secret configured. Signature cannot be verified.");
        return false;
    }
    let expected = calculate_hmac(secret, raw_body);
    expected.as_bytes().ct_eq(provided_signature.as_bytes()).into()
}
