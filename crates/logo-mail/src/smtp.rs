//! # SMTP Logo Delivery
//!
//! [`SmtpMailer`] downloads the generated image and sends it to the customer
//! as a `logo.png` attachment over a STARTTLS relay.

use crate::config::EmailConfig;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use logo_core::{LogoError, LogoResult, Mailer, Order};
use reqwest::Client;
use tracing::{debug, info, instrument};

/// Attachment file name
pub const ATTACHMENT_NAME: &str = "logo.png";

const DEFAULT_IMAGE_TYPE: &str = "image/png";

fn email_error(context: &str, err: impl std::fmt::Display) -> LogoError {
    LogoError::EmailDelivery(format!("{}: {}", context, err))
}

/// Sends finished logos via SMTP.
pub struct SmtpMailer {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    client: Client,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> LogoResult<Self> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| LogoError::Configuration(format!("Invalid SMTP relay: {}", e)))?
                .port(config.smtp_port)
                .timeout(config.timeout);

        if let Some(password) = &config.password {
            transport_builder = transport_builder
                .credentials(Credentials::new(config.from_address.clone(), password.clone()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            LogoError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            transport: transport_builder.build(),
            config,
            client,
        })
    }

    /// Download the generated image, returning its bytes and content type
    async fn fetch_image(&self, url: &str) -> LogoResult<(Vec<u8>, ContentType)> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| email_error("Image download failed", e))?;

        if !response.status().is_success() {
            return Err(email_error("Image download failed", response.status()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or(DEFAULT_IMAGE_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| email_error("Image download failed", e))?;

        let content_type = ContentType::parse(&content_type)
            .or_else(|_| ContentType::parse(DEFAULT_IMAGE_TYPE))
            .map_err(|e| email_error("Invalid content type", e))?;

        Ok((bytes.to_vec(), content_type))
    }

    /// Assemble the message with the image attached
    pub fn build_message(
        &self,
        order: &Order,
        image: Vec<u8>,
        content_type: ContentType,
    ) -> LogoResult<Message> {
        let from: Mailbox = self
            .config
            .from_address
            .parse()
            .map_err(|e| email_error("Invalid sender address", e))?;
        let to: Mailbox = order
            .email
            .parse()
            .map_err(|e| email_error("Invalid recipient address", e))?;

        let text = format!(
            "Hello {},\n\nThank you for your order. Your logo is attached.\n\nOrder #{}\n",
            order.name, order.id
        );

        Message::builder()
            .from(from)
            .to(to)
            .subject(format!("Your AI logo for {}", order.name))
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(text))
                    .singlepart(
                        Attachment::new(ATTACHMENT_NAME.to_string()).body(image, content_type),
                    ),
            )
            .map_err(|e| email_error("Email build error", e))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, order), fields(order_id = order.id, to = %order.email))]
    async fn send_logo(&self, order: &Order) -> LogoResult<()> {
        let (image, content_type) = self.fetch_image(&order.image_url).await?;
        debug!(bytes = image.len(), "Downloaded logo for attachment");

        let email = self.build_message(order, image, content_type)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| email_error("SMTP transport error", e))?;

        info!("Logo email sent");
        Ok(())
    }
}

/// Mailer used when no sender is configured: every attempt fails and is logged
/// by the caller like any other delivery failure.
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send_logo(&self, _order: &Order) -> LogoResult<()> {
        Err(LogoError::EmailDelivery(
            "email delivery is not configured (EMAIL_FROM unset)".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mailer() -> SmtpMailer {
        SmtpMailer::new(EmailConfig::new("shop@example.com")).unwrap()
    }

    fn order(image_url: &str) -> Order {
        Order {
            id: 1,
            name: "Acme".to_string(),
            email: "a@x.com".to_string(),
            image_url: image_url.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_message_attaches_logo() {
        let content_type = ContentType::parse("image/png").unwrap();
        let message = mailer()
            .build_message(&order("http://img/1.png"), vec![0x89, 0x50, 0x4e, 0x47], content_type)
            .unwrap();

        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("Subject: Your AI logo for Acme"));
        assert!(raw.contains("To: a@x.com"));
        assert!(raw.contains("filename=\"logo.png\""));
        assert!(raw.contains("image/png"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let mut bad = order("http://img/1.png");
        bad.email = "not-an-email".to_string();

        let content_type = ContentType::parse("image/png").unwrap();
        let err = mailer().build_message(&bad, vec![], content_type).unwrap_err();
        assert!(matches!(err, LogoError::EmailDelivery(_)));
    }

    #[tokio::test]
    async fn test_fetch_image() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![1u8, 2, 3]),
            )
            .mount(&server)
            .await;

        let (bytes, _) = mailer()
            .fetch_image(&format!("{}/1.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_image_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = mailer()
            .fetch_image(&format!("{}/gone.png", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, LogoError::EmailDelivery(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_fails() {
        let err = UnconfiguredMailer
            .send_logo(&order("http://img/1.png"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
