use log::*;
use rpg_common::Secret;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com";

#[derive(Debug, Clone, Default)]
pub struct RazorpayConfig {
    /// Base URL of the REST API, without the version segment. e.g. "https://api.razorpay.com"
    pub api_url: String,
    pub key_id: String,
    pub key_secret: Secret<String>,
}

impl RazorpayConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("RPG_RAZORPAY_API_URL").unwrap_or_else(|_| {
            debug!("RPG_RAZORPAY_API_URL not set, using {DEFAULT_RAZORPAY_API_URL} as default");
            DEFAULT_RAZORPAY_API_URL.to_string()
        });
        let key_id = std::env::var("RPG_RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("RPG_RAZORPAY_KEY_ID not set, using (probably useless) default");
            "rzp_test_00000000000000".to_string()
        });
        let key_secret = Secret::new(std::env::var("RPG_RAZORPAY_SECRET_KEY").unwrap_or_else(|_| {
            warn!("RPG_RAZORPAY_SECRET_KEY not set, using (probably useless) default");
            "00000000000000".to_string()
        }));
        Self { api_url, key_id, key_secret }
    }
}
