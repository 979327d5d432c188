//! Redirect URLs handed to the payment provider.

use logo_core::{CustomerDetails, LogoError, LogoResult};
use reqwest::Url;

/// Placeholder the provider substitutes with the real session id on redirect.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Success and cancel URLs rooted at the frontend origin
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    domain_url: String,
}

impl CheckoutUrls {
    pub fn new(domain_url: &str) -> Self {
        Self {
            domain_url: domain_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{domain}/success?email=..&name=..&session_id={CHECKOUT_SESSION_ID}`
    ///
    /// Email and name are percent-encoded; the placeholder stays literal.
    pub fn success_url(&self, customer: &CustomerDetails) -> LogoResult<String> {
        let url = Url::parse_with_params(
            &format!("{}/success", self.domain_url),
            &[
                ("email", customer.email.as_str()),
                ("name", customer.name.as_str()),
            ],
        )
        .map_err(|e| LogoError::Configuration(format!("Invalid DOMAIN_URL: {}", e)))?;

        Ok(format!("{}&session_id={}", url, SESSION_ID_PLACEHOLDER))
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/cancel", self.domain_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(name: &str, email: &str) -> CustomerDetails {
        CustomerDetails {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_success_url_encodes_customer() {
        let urls = CheckoutUrls::new("http://localhost:3000/");
        let url = urls
            .success_url(&customer("Acme & Co", "a+b@x.com"))
            .unwrap();

        assert!(url.starts_with("http://localhost:3000/success?"));
        assert!(url.contains("email=a%2Bb%40x.com"));
        assert!(url.contains("name=Acme+%26+Co"));
        assert!(url.ends_with("&session_id={CHECKOUT_SESSION_ID}"));
    }

    #[test]
    fn test_cancel_url() {
        let urls = CheckoutUrls::new("https://shop.example.com");
        assert_eq!(urls.cancel_url(), "https://shop.example.com/cancel");
    }

    #[test]
    fn test_invalid_domain() {
        let urls = CheckoutUrls::new("not a url");
        assert!(urls.success_url(&customer("Acme", "a@x.com")).is_err());
    }
}
