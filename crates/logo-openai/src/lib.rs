//! # logo-openai
//!
//! OpenAI Images API client implementing `logo_core::ImageGenerator`.

pub mod config;
pub mod images;

pub use config::OpenAiConfig;
pub use images::OpenAiImageGenerator;
