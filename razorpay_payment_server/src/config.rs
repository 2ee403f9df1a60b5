//! Server configuration
//!
//! All configuration is read from environment variables (optionally from a `.env` file). Missing or invalid values
//! are logged and replaced with defaults, so the server always starts. See `cli-help.txt` for the full list.
use std::env;

use chrono::Duration;
use log::*;
use razorpay_tools::RazorpayConfig;
use rpg_common::{helpers::parse_boolean_flag, Secret};

const DEFAULT_RPG_HOST: &str = "127.0.0.1";
const DEFAULT_RPG_PORT: u16 = 5000;
const DEFAULT_CURRENCY: &str = "INR";
const DEFAULT_RECEIPT_PREFIX: &str = "rpg";
const DEFAULT_CORS_ORIGIN: &str = "*";
const DEFAULT_MAIL_SUBJECT: &str = "New Order Received";
const DEFAULT_STALE_ORDER_REPORT_INTERVAL: Duration = Duration::minutes(60);
const DEFAULT_STALE_ORDER_AGE: Duration = Duration::hours(24);
/// The gateway accepts receipts of up to 40 characters. `_receipt_` and a millisecond timestamp take up 22 of them.
const MAX_RECEIPT_PREFIX_LEN: usize = 18;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Credentials for the gateway's order API
    pub razorpay_config: RazorpayConfig,
    pub webhook: WebhookConfig,
    pub notifier: NotifierConfig,
    /// The value of the `Access-Control-Allow-Origin` header on API responses. The storefront calls `/create-order`
    /// from the browser.
    pub cors_origin: String,
    pub currency: String,
    pub receipt_prefix: String,
    /// How often unpaid orders are reported. A zero duration disables the report.
    pub stale_order_report_interval: Duration,
    /// The age at which an unpaid order is included in the report.
    pub stale_order_age: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct WebhookConfig {
    pub secret: Secret<String>,
    /// If false, signatures are not checked at all. Only ever useful for local testing.
    pub hmac_checks: bool,
}

#[derive(Clone, Debug, Default)]
pub struct NotifierConfig {
    /// If `None`, order summaries are written to the log instead of being mailed.
    pub relay_url: Option<String>,
    pub relay_token: Secret<String>,
    pub from: String,
    pub to: String,
    pub subject: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPG_HOST.to_string(),
            port: DEFAULT_RPG_PORT,
            razorpay_config: RazorpayConfig::default(),
            webhook: WebhookConfig::default(),
            notifier: NotifierConfig::default(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            receipt_prefix: DEFAULT_RECEIPT_PREFIX.to_string(),
            stale_order_report_interval: DEFAULT_STALE_ORDER_REPORT_INTERVAL,
            stale_order_age: DEFAULT_STALE_ORDER_AGE,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("RPG_HOST").ok().unwrap_or_else(|| DEFAULT_RPG_HOST.into());
        let port = env::var("RPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for RPG_PORT. {e} Using the default, {DEFAULT_RPG_PORT}, instead."
                    );
                    DEFAULT_RPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_RPG_PORT);
        let razorpay_config = RazorpayConfig::new_from_env_or_default();
        let webhook = WebhookConfig::from_env_or_defaults();
        let notifier = NotifierConfig::from_env_or_defaults();
        let cors_origin = env::var("RPG_CORS_ORIGIN").ok().unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into());
        let currency = env::var("RPG_CURRENCY")
            .map(|s| s.trim().to_uppercase())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.into());
        let receipt_prefix = configure_receipt_prefix();
        let stale_order_report_interval = duration_from_env(
            "RPG_STALE_ORDER_REPORT_INTERVAL",
            Duration::minutes,
            DEFAULT_STALE_ORDER_REPORT_INTERVAL,
        );
        let stale_order_age = duration_from_env("RPG_STALE_ORDER_AGE", Duration::hours, DEFAULT_STALE_ORDER_AGE);
        Self {
            host,
            port,
            razorpay_config,
            webhook,
            notifier,
            cors_origin,
            currency,
            receipt_prefix,
            stale_order_report_interval,
            stale_order_age,
        }
    }
}

impl WebhookConfig {
    pub fn from_env_or_defaults() -> Self {
        let secret = env::var("RPG_RAZORPAY_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ RPG_RAZORPAY_WEBHOOK_SECRET is not set. Please set it to the secret configured for the webhook in \
                 the payment gateway dashboard. Until then, every webhook call will be rejected."
            );
            String::default()
        });
        let hmac_checks = parse_boolean_flag(env::var("RPG_WEBHOOK_HMAC_CHECKS").ok(), true);
        if !hmac_checks {
            warn!(
                "🚨️🚨️🚨️ Webhook signature checks are DISABLED. Anyone can mark orders as paid. Do not run a \
                 production server like this. 🚨️🚨️🚨️"
            );
        }
        Self { secret: Secret::new(secret), hmac_checks }
    }
}

impl NotifierConfig {
    pub fn from_env_or_defaults() -> Self {
        let relay_url = env::var("RPG_MAIL_RELAY_URL").ok().filter(|s| !s.trim().is_empty());
        let relay_token = Secret::new(env::var("RPG_MAIL_RELAY_TOKEN").ok().unwrap_or_default());
        let from = env::var("RPG_MAIL_FROM").ok().unwrap_or_default();
        let to = env::var("RPG_OWNER_EMAIL").ok().unwrap_or_default();
        let subject = env::var("RPG_MAIL_SUBJECT").ok().unwrap_or_else(|| DEFAULT_MAIL_SUBJECT.into());
        match &relay_url {
            Some(url) => {
                info!("🪛️ Order notifications will be sent via the mail relay at {url}");
                if to.is_empty() {
                    error!("🪛️ RPG_OWNER_EMAIL is not set. The mail relay will have no recipient for order mails.");
                }
            },
            None => info!(
                "🪛️ RPG_MAIL_RELAY_URL is not set. Order notifications will be written to the log instead of being \
                 mailed."
            ),
        }
        Self { relay_url, relay_token, from, to, subject }
    }
}

fn configure_receipt_prefix() -> String {
    let prefix = env::var("RPG_RECEIPT_PREFIX").ok().unwrap_or_else(|| DEFAULT_RECEIPT_PREFIX.into());
    if prefix.is_empty() || prefix.len() > MAX_RECEIPT_PREFIX_LEN {
        warn!(
            "🪛️ RPG_RECEIPT_PREFIX must be between 1 and {MAX_RECEIPT_PREFIX_LEN} characters long. Using \
             '{DEFAULT_RECEIPT_PREFIX}' instead."
        );
        return DEFAULT_RECEIPT_PREFIX.into();
    }
    prefix
}

fn duration_from_env(name: &str, unit: fn(i64) -> Duration, default: Duration) -> Duration {
    env::var(name)
        .map_err(|_| info!("🪛️ {name} is not set. Using the default value of {} min.", default.num_minutes()))
        .and_then(|s| {
            s.trim()
                .parse::<i64>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for {name}. {e}"))
                .and_then(|v| {
                    if v < 0 {
                        warn!("🪛️ {name} cannot be negative. Using the default.");
                        Err(())
                    } else {
                        Ok(unit(v))
                    }
                })
        })
        .ok()
        .unwrap_or(default)
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that is used to configure the server's behaviour. Generally we try to keep this
/// as small as possible, and exclude secrets to avoid passing sensitive information around the system.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub currency: String,
    pub receipt_prefix: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self { currency: DEFAULT_CURRENCY.to_string(), receipt_prefix: DEFAULT_RECEIPT_PREFIX.to_string() }
    }
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { currency: config.currency.clone(), receipt_prefix: config.receipt_prefix.clone() }
    }
}
