use chrono::Utc;

/// Builds the receipt label sent to the gateway with a new order, e.g. `rpg_receipt_1718000000000`.
pub fn new_receipt(prefix: &str) -> String {
    format!("{prefix}_receipt_{}", Utc::now().timestamp_millis())
}

/// The symbol used for `currency` in messages meant for people. Falls back to the ISO code.
pub fn currency_symbol(currency: &str) -> String {
    match currency.to_uppercase().as_str() {
        "INR" => "₹".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        other => format!("{other} "),
    }
}
