//! # logo-mail
//!
//! SMTP delivery of generated logos, implementing `logo_core::Mailer`.

pub mod config;
pub mod smtp;

pub use config::EmailConfig;
pub use smtp::{SmtpMailer, UnconfiguredMailer, ATTACHMENT_NAME};
