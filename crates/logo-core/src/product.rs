//! # Product
//!
//! The shop sells exactly one thing: an AI-generated logo at a fixed price.

use serde::{Deserialize, Serialize};

/// Unit price of one logo, in minor units
pub const LOGO_PRICE_CENTS: i64 = 500;

/// Image size requested from the generator
pub const LOGO_IMAGE_SIZE: &str = "512x512";

/// Currency the shop charges in (ISO 4217)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    EUR,
}

impl Currency {
    /// Returns the lowercase ISO 4217 code Stripe expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::EUR => "eur",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "€",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// The fixed price of a logo
    pub fn logo() -> Self {
        Self::from_cents(LOGO_PRICE_CENTS, Currency::EUR)
    }

    /// Format for display (e.g., "€5.00")
    pub fn display(&self) -> String {
        format!(
            "{}{}.{:02}",
            self.currency.symbol(),
            self.amount / 100,
            self.amount % 100
        )
    }
}

/// Line item name shown on the hosted checkout page
pub fn logo_product_name(customer_name: &str) -> String {
    format!("AI logo for {}", customer_name)
}

/// Prompt sent to the image generator
pub fn logo_prompt(customer_name: &str) -> String {
    format!("Minimal vector-style logo for {}", customer_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_price() {
        let price = Price::logo();
        assert_eq!(price.amount, 500);
        assert_eq!(price.currency, Currency::EUR);
        assert_eq!(price.display(), "€5.00");
    }

    #[test]
    fn test_templates() {
        assert_eq!(logo_prompt("Acme"), "Minimal vector-style logo for Acme");
        assert_eq!(logo_product_name("Acme"), "AI logo for Acme");
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(Currency::EUR.as_str(), "eur");
        assert_eq!(Currency::EUR.to_string(), "EUR");
        assert_eq!(Currency::default(), Currency::EUR);
    }
}
