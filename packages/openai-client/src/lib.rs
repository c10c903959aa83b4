//! Pure OpenAI REST API client
//!
//! A small client for OpenAI-compatible chat completion endpoints with no
//! domain-specific logic. Covers strict JSON-schema structured outputs, with
//! either a text prompt or an inline image as input.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{InlineImage, OpenAIClient};
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Tag {
//!     brand: String,
//!     price: f64,
//! }
//!
//! let client = OpenAIClient::from_env()?;
//! let image = InlineImage::new(base64_data, "image/jpeg");
//!
//! // Schema generated automatically from the type
//! let tag: Tag = client
//!     .extract_from_image::<Tag>("gpt-4o-mini", &image, "Read the price tag")
//!     .await?;
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{OpenAIError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Longest error body kept in an `OpenAIError::Api` message.
const MAX_ERROR_BODY_BYTES: usize = 512;

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        if api_key.trim().is_empty() {
            return Err(OpenAIError::Config("OPENAI_API_KEY is empty".into()));
        }
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Type-safe structured output from an inline image.
    ///
    /// The JSON schema is generated from `T`; the instruction is sent in the
    /// same user message as the image.
    pub async fn extract_from_image<T: StructuredOutput>(
        &self,
        model: &str,
        image: &InlineImage,
        instruction: impl Into<String>,
    ) -> Result<T> {
        debug!(
            type_name = T::type_name(),
            mime_type = %image.mime_type,
            encoded_len = image.data.len(),
            "Structured vision extraction"
        );

        let request = StructuredRequest::vision(model, image, instruction, T::openai_schema())
            .schema_name(T::type_name());
        self.extract_with(request).await
    }

    async fn extract_with<T: StructuredOutput>(&self, request: StructuredRequest) -> Result<T> {
        let json_str = self.structured_output(request).await?;

        serde_json::from_str(strip_code_blocks(&json_str)).map_err(|e| {
            OpenAIError::Parse(format!("Failed to deserialize response: {}", e))
        })
    }

    /// Structured output with JSON schema.
    ///
    /// Uses OpenAI's `json_schema` response format for guaranteed valid JSON.
    /// Returns the raw JSON text of the first choice.
    pub async fn structured_output(&self, request: StructuredRequest) -> Result<String> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, "OpenAI structured output error");
            return Err(OpenAIError::Api(format!(
                "OpenAI structured output error ({}): {}",
                status,
                truncate_to_char_boundary(&error_text, MAX_ERROR_BODY_BYTES)
            )));
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                model = %request.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                duration_ms = start.elapsed().as_millis(),
                "OpenAI structured output"
            );
        }

        let message = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| OpenAIError::Api("No response from OpenAI".into()))?;

        match (message.content, message.refusal) {
            (Some(content), _) if !content.trim().is_empty() => Ok(content),
            (_, Some(refusal)) => Err(OpenAIError::Refused(refusal)),
            _ => Err(OpenAIError::Api("Empty response content".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("sk-test").with_base_url("https://custom.api.com/");

        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.base_url, "https://custom.api.com");
    }

    #[test]
    fn test_default_base_url() {
        let client = OpenAIClient::new("sk-test");
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
    }
}
