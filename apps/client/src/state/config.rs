//! # Configuration State
//!
//! Store configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`MEDWEAR_*`)
//! 2. Defaults (this file)
//!
//! Store API connection settings live in [`medwear_http::HttpConfig`].
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::env;

use medwear_core::{BarcodeClassifier, Money, ShippingPolicy};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (displayed on receipts)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places shown for currency
    pub currency_decimals: u8,

    /// Storefront delivery charge below the free-shipping minimum
    pub shipping_fee: Money,

    /// Subtotal at which delivery becomes free
    pub free_shipping_minimum: Money,

    /// Prefix printed on the store's own barcode labels
    pub barcode_prefix: String,

    /// Surcharge for embroidery / name printing on a line
    pub customization_price: Money,

    /// POS asks before clearing the cart
    pub require_clear_confirmation: bool,

    /// Stock at or below this shows a "low stock" badge
    pub low_stock_threshold: u32,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Medwear"
    /// - Currency: PKR (Rs.)
    /// - Shipping: Rs. 200, free from Rs. 5,000
    /// - Customization: Rs. 300
    fn default() -> Self {
        ConfigState {
            store_name: "Medwear".to_string(),
            currency_code: "PKR".to_string(),
            currency_symbol: "Rs. ".to_string(),
            currency_decimals: 2,
            shipping_fee: Money::from_major(200),
            free_shipping_minimum: Money::from_major(5000),
            barcode_prefix: "MW-".to_string(),
            customization_price: Money::from_major(300),
            require_clear_confirmation: true,
            low_stock_threshold: medwear_core::DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `MEDWEAR_STORE_NAME`
    /// - `MEDWEAR_CURRENCY_CODE`, `MEDWEAR_CURRENCY_SYMBOL`
    /// - `MEDWEAR_SHIPPING_FEE`, `MEDWEAR_FREE_SHIPPING_MINIMUM` (e.g. "250.00")
    /// - `MEDWEAR_BARCODE_PREFIX`
    /// - `MEDWEAR_CUSTOMIZATION_PRICE`
    /// - `MEDWEAR_CONFIRM_CLEAR_CART` ("true"/"false")
    ///
    /// Unparsable values are logged and the default is kept.
    pub fn from_env() -> Self {
        let mut config = ConfigState::default();

        if let Ok(store_name) = env::var("MEDWEAR_STORE_NAME") {
            config.store_name = store_name;
        }
        if let Ok(code) = env::var("MEDWEAR_CURRENCY_CODE") {
            config.currency_code = code;
        }
        if let Ok(symbol) = env::var("MEDWEAR_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }
        if let Ok(prefix) = env::var("MEDWEAR_BARCODE_PREFIX") {
            config.barcode_prefix = prefix;
        }

        money_var("MEDWEAR_SHIPPING_FEE", &mut config.shipping_fee);
        money_var("MEDWEAR_FREE_SHIPPING_MINIMUM", &mut config.free_shipping_minimum);
        money_var("MEDWEAR_CUSTOMIZATION_PRICE", &mut config.customization_price);

        if let Ok(raw) = env::var("MEDWEAR_CONFIRM_CLEAR_CART") {
            match raw.trim().parse::<bool>() {
                Ok(flag) => config.require_clear_confirmation = flag,
                Err(_) => warn!(value = %raw, "Ignoring MEDWEAR_CONFIRM_CLEAR_CART"),
            }
        }

        config
    }

    /// Storefront shipping rule built from this configuration.
    pub fn shipping_policy(&self) -> ShippingPolicy {
        ShippingPolicy {
            shipping_fee: self.shipping_fee,
            free_shipping_minimum: self.free_shipping_minimum,
        }
    }

    pub fn barcode_classifier(&self) -> BarcodeClassifier {
        BarcodeClassifier::new(self.barcode_prefix.clone())
    }

    /// Formats a minor-unit amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_client::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(123456), "Rs. 1234.56");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

fn money_var(name: &str, target: &mut Money) {
    if let Ok(raw) = env::var(name) {
        match Money::parse_decimal(&raw) {
            Ok(value) if !value.is_negative() => *target = value,
            _ => warn!(variable = name, value = %raw, "Ignoring invalid amount"),
        }
    }
}
