//! Analyzed items and the edits operators make to them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extraction::ExtractionResult;
use super::image::ImageSource;
use crate::input::parse_numeric_input;
use crate::pricing::PriceRules;

/// Opaque item identifier (random UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One analyzed photograph.
///
/// `id` and `has_price` are fixed at ingestion. The descriptive fields and the
/// listed price stay editable, but an edit never moves the item between the
/// priced and unpriced collections.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    pub image: ImageSource,
    pub brand: String,
    pub product_name: String,
    pub sku: String,
    pub listed_price: f64,
    has_price: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl Item {
    /// Build an item from an extraction, classifying it exactly once.
    pub fn from_extraction(image: ImageSource, result: ExtractionResult) -> Self {
        let has_price = result.is_priced();
        Self {
            id: ItemId::new(),
            image,
            brand: result.brand,
            product_name: result.product_name,
            sku: result.sku,
            listed_price: result.listed_price,
            has_price,
            analyzed_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Classification at ingestion; unaffected by later price edits.
    pub fn has_price(&self) -> bool {
        self.has_price
    }

    /// Merge the fields present in `patch`.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(brand) = &patch.brand {
            self.brand.clone_from(brand);
        }
        if let Some(product_name) = &patch.product_name {
            self.product_name.clone_from(product_name);
        }
        if let Some(sku) = &patch.sku {
            self.sku.clone_from(sku);
        }
        if let Some(listed_price) = patch.listed_price {
            self.listed_price = listed_price;
        }
    }

    /// Shareable summary from the item's current (possibly edited) fields.
    pub fn summary(&self, rules: &PriceRules, exchange_rate: f64) -> String {
        rules.render_summary(&self.brand, &self.product_name, self.listed_price, exchange_rate)
    }
}

/// Editable item attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemField {
    Brand,
    ProductName,
    Sku,
    ListedPrice,
}

impl FromStr for ItemField {
    type Err = UnknownField;

    /// Accepts both the snake_case and the camelCase spelling, plus the
    /// provider's `priceEuro`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brand" => Ok(Self::Brand),
            "productName" | "product_name" => Ok(Self::ProductName),
            "sku" => Ok(Self::Sku),
            "listedPrice" | "listed_price" | "priceEuro" | "price_euro" => Ok(Self::ListedPrice),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Field name that does not match any [`ItemField`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item field: {0}")]
pub struct UnknownField(pub String);

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub brand: Option<String>,
    pub product_name: Option<String>,
    pub sku: Option<String>,
    pub listed_price: Option<f64>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = Some(product_name.into());
        self
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn listed_price(mut self, listed_price: f64) -> Self {
        self.listed_price = Some(listed_price);
        self
    }

    /// Patch for one raw form edit. Price text that is not a number becomes 0.
    pub fn from_field(field: ItemField, raw: &str) -> Self {
        match field {
            ItemField::Brand => Self::new().brand(raw),
            ItemField::ProductName => Self::new().product_name(raw),
            ItemField::Sku => Self::new().sku(raw),
            ItemField::ListedPrice => Self::new().listed_price(parse_numeric_input(raw)),
        }
    }
}
