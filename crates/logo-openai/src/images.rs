//! # OpenAI Images
//!
//! `ImageGenerator` backed by the `/v1/images/generations` endpoint.

use crate::config::OpenAiConfig;
use async_trait::async_trait;
use logo_core::{GeneratedImage, ImageGenerator, LogoError, LogoResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "openai";

/// Generates one hosted image per prompt.
pub struct OpenAiImageGenerator {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiImageGenerator {
    pub fn new(config: OpenAiConfig) -> LogoResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            LogoError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> LogoResult<Self> {
        Self::new(OpenAiConfig::from_env()?)
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    #[instrument(skip(self), fields(model = %self.config.model))]
    async fn generate(&self, prompt: &str) -> LogoResult<GeneratedImage> {
        let request = ImageRequest {
            model: &self.config.model,
            prompt,
            n: 1,
            size: &self.config.size,
            response_format: "url",
        };

        let url = format!("{}/v1/images/generations", self.config.api_base_url);
        debug!("Requesting image generation");

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(|e| LogoError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LogoError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("OpenAI API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(&body) {
                return Err(LogoError::provider(PROVIDER, error_response.error.message));
            }

            return Err(LogoError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let parsed: ImageResponse = serde_json::from_str(&body).map_err(|e| {
            LogoError::Serialization(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let image = parsed
            .data
            .into_iter()
            .find_map(|d| {
                d.url.map(|url| GeneratedImage {
                    url,
                    revised_prompt: d.revised_prompt,
                })
            })
            .ok_or_else(|| LogoError::provider(PROVIDER, "Response contained no image URL"))?;

        info!("Generated image");

        Ok(image)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// OpenAI API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiError,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
}
