//! # Order Types
//!
//! Customer details and the append-only order record.

use crate::error::{LogoError, LogoResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum stored length of a customer name
pub const MAX_NAME_LEN: usize = 120;

/// Maximum stored length of a customer email
pub const MAX_EMAIL_LEN: usize = 120;

/// Validated name/email pair submitted by a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
}

impl CustomerDetails {
    /// Validate raw request fields.
    ///
    /// Both fields are trimmed; absent or blank values are rejected.
    pub fn parse(name: Option<&str>, email: Option<&str>) -> LogoResult<Self> {
        let name = name.map(str::trim).unwrap_or_default();
        let email = email.map(str::trim).unwrap_or_default();

        if name.is_empty() || email.is_empty() {
            return Err(LogoError::InvalidRequest(
                "Name and email required".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(LogoError::InvalidRequest(format!(
                "Name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        if email.chars().count() > MAX_EMAIL_LEN {
            return Err(LogoError::InvalidRequest(format!(
                "Email must be at most {} characters",
                MAX_EMAIL_LEN
            )));
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
        })
    }
}

/// An image returned by the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Hosted URL of the generated image
    pub url: String,

    /// Prompt as rewritten by the provider, if it reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

impl GeneratedImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            revised_prompt: None,
        }
    }

    /// The prompt the image was actually drawn from: the provider's rewrite
    /// when reported, otherwise the one that was sent.
    pub fn effective_prompt<'a>(&'a self, requested: &'a str) -> &'a str {
        self.revised_prompt.as_deref().unwrap_or(requested)
    }
}

/// An order about to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl NewOrder {
    pub fn new(customer: &CustomerDetails, image: &GeneratedImage) -> Self {
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
            image_url: image.url.clone(),
        }
    }
}

/// A persisted order
///
/// Orders are created once per fulfilled logo and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Sequential identifier assigned by the store
    pub id: i64,

    /// Customer name
    pub name: String,

    /// Customer email
    pub email: String,

    /// Generated logo URL
    pub image_url: String,

    /// Creation timestamp
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_prompt_prefers_revision() {
        let mut image = GeneratedImage::new("http://img/1.png");
        assert_eq!(image.effective_prompt("Logo for Acme"), "Logo for Acme");

        image.revised_prompt = Some("A flat blue logo for Acme".to_string());
        assert_eq!(
            image.effective_prompt("Logo for Acme"),
            "A flat blue logo for Acme"
        );
    }

    #[test]
    fn test_customer_details_trims() {
        let customer = CustomerDetails::parse(Some("  Acme "), Some("a@x.com\n")).unwrap();
        assert_eq!(customer.name, "Acme");
        assert_eq!(customer.email, "a@x.com");
    }

    #[test]
    fn test_customer_details_missing_fields() {
        assert!(matches!(
            CustomerDetails::parse(None, Some("a@x.com")),
            Err(LogoError::InvalidRequest(_))
        ));
        assert!(matches!(
            CustomerDetails::parse(Some("Acme"), Some("   ")),
            Err(LogoError::InvalidRequest(_))
        ));
        assert!(CustomerDetails::parse(Some(""), None).is_err());
    }

    #[test]
    fn test_customer_details_length_limit() {
        let long_name = "x".repeat(MAX_NAME_LEN + 1);
        let err = CustomerDetails::parse(Some(&long_name), Some("a@x.com")).unwrap_err();
        assert_eq!(err.status_code(), 400);

        let exact = "y".repeat(MAX_NAME_LEN);
        assert!(CustomerDetails::parse(Some(&exact), Some("a@x.com")).is_ok());
    }

    #[test]
    fn test_order_serializes_date_field() {
        let order = Order {
            id: 7,
            name: "Acme".to_string(),
            email: "a@x.com".to_string(),
            image_url: "http://img/1.png".to_string(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["image_url"], "http://img/1.png");
        assert_eq!(json["date"], "2023-11-14T22:13:20Z");
        assert!(json.get("created_at").is_none());
    }
}
