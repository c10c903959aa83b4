//! OpenAI vision analyzer.

use async_trait::async_trait;
use openai_client::{InlineImage, OpenAIClient, OpenAIError};
use tracing::debug;

use crate::config::Config;
use crate::error::{AnalysisError, AnalysisResult, ConfigError};
use crate::traits::ImageAnalyzer;
use crate::types::{EncodedImage, ExtractionResult, ProductTagResponse};

/// Instruction sent alongside every product photo.
pub const PRODUCT_TAG_INSTRUCTION: &str = "Analyze this image for product details. specifically looking for a price tag. Extract the Brand, Product Name, SKU/Reference Number, and Price (in Euros). If no price is clearly visible, mark hasPrice as false.";

/// [`ImageAnalyzer`] backed by OpenAI structured vision output.
#[derive(Clone)]
pub struct OpenAIAnalyzer {
    client: OpenAIClient,
    model: String,
}

impl OpenAIAnalyzer {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build from configuration. Requires `OPENAI_API_KEY`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut client = OpenAIClient::new(config.require_api_key()?);
        if let Some(base_url) = &config.openai_base_url {
            client = client.with_base_url(base_url.as_str());
        }
        Ok(Self::new(client, config.vision_model.as_str()))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ImageAnalyzer for OpenAIAnalyzer {
    async fn analyze_image(&self, image: &EncodedImage) -> AnalysisResult<ExtractionResult> {
        debug!(
            image = %image.label,
            model = %self.model,
            bytes = image.decoded_len(),
            "Requesting product tag extraction"
        );

        let inline = InlineImage::new(image.data.as_str(), image.mime_type.as_str());
        let tag: ProductTagResponse = self
            .client
            .extract_from_image(&self.model, &inline, PRODUCT_TAG_INSTRUCTION)
            .await
            .map_err(|e| match e {
                OpenAIError::Refused(refusal) => {
                    debug!(image = %image.label, %refusal, "Model refused to read image");
                    AnalysisError::MissingOutput
                }
                other => AnalysisError::provider(other),
            })?;

        Ok(tag.into())
    }
}
