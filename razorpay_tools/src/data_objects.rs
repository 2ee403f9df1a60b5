use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for `POST /v1/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRazorpayOrder {
    /// Order total in the currency's smallest unit (paise for INR)
    pub amount: i64,
    pub currency: String,
    /// Merchant-side reference for the order. At most 40 characters.
    pub receipt: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub notes: Map<String, Value>,
}

impl NewRazorpayOrder {
    pub fn new<S: Into<String>>(amount: i64, currency: S, receipt: S) -> Self {
        Self { amount, currency: currency.into(), receipt: receipt.into(), notes: Map::new() }
    }
}

/// An order entity as returned by the API. Fields this crate doesn't model are kept in `extra` so that the complete
/// object can be handed on to checkout clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub created_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
