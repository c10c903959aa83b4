//! Extraction results and the provider's wire shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placeholder text for attributes that could not be read.
pub const UNKNOWN: &str = "Unknown";

/// Uniform output of the extraction adapter.
///
/// Either what the provider read off the photo, or the failure sentinel
/// (see [`ExtractionResult::sentinel`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub has_price: bool,
    pub brand: String,
    pub product_name: String,
    pub sku: String,
    pub listed_price: f64,
}

impl ExtractionResult {
    /// Result substituted for any failed analysis.
    pub fn sentinel() -> Self {
        Self {
            has_price: false,
            brand: UNKNOWN.to_string(),
            product_name: UNKNOWN.to_string(),
            sku: UNKNOWN.to_string(),
            listed_price: 0.0,
        }
    }

    /// A result with a visible price tag.
    pub fn priced(
        brand: impl Into<String>,
        product_name: impl Into<String>,
        sku: impl Into<String>,
        listed_price: f64,
    ) -> Self {
        Self {
            has_price: true,
            brand: brand.into(),
            product_name: product_name.into(),
            sku: sku.into(),
            listed_price,
        }
    }

    /// A result without a readable price tag.
    pub fn unpriced(brand: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self {
            has_price: false,
            brand: brand.into(),
            product_name: product_name.into(),
            sku: UNKNOWN.to_string(),
            listed_price: 0.0,
        }
    }

    /// Classification rule: priced iff flagged AND the price is positive.
    ///
    /// A `has_price` flag with a zero, negative or NaN price is unpriced.
    pub fn is_priced(&self) -> bool {
        self.has_price && self.listed_price > 0.0
    }
}

/// JSON shape the vision provider must return.
///
/// Field docs become schema descriptions in the structured-output request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductTagResponse {
    /// True if a price tag (usually in Euros/€) is clearly visible in the image.
    pub has_price: bool,

    /// The brand name of the product (e.g., Chanel, Hermes, LV).
    pub brand: String,

    /// The name or type of the product.
    pub product_name: String,

    /// The numeric price value found on the tag. If multiple prices, prefer the final/discounted one. Ignore currency symbols.
    pub price_euro: f64,

    /// The model number, reference number, or SKU found on the tag.
    pub sku: String,
}

impl From<ProductTagResponse> for ExtractionResult {
    fn from(tag: ProductTagResponse) -> Self {
        Self {
            has_price: tag.has_price,
            brand: tag.brand,
            product_name: tag.product_name,
            sku: tag.sku,
            listed_price: tag.price_euro,
        }
    }
}
