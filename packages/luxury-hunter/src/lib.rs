//! Product-Photo Pricing Library
//!
//! Turns batches of in-store product photos into priced listings. Each photo
//! is sent to a vision provider that reads the brand, product name, SKU and
//! euro price off the tag; priced items get a fee-adjusted, currency-converted
//! summary ready to paste into a chat.
//!
//! # Design
//!
//! - Analysis is total: provider failures become an "Unknown" unpriced item
//! - Every photo in a batch is analyzed concurrently
//! - Classification happens once, at ingestion
//! - Pricing is pure arithmetic over `(listed_price, exchange_rate)`
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use luxury_hunter::{run_batch, ExtractionAdapter, ImageInput, Registry};
//! use luxury_hunter::testing::MockAnalyzer;
//!
//! let adapter = ExtractionAdapter::new(Arc::new(MockAnalyzer::new()));
//! let registry = Registry::new();
//!
//! let report = run_batch(&adapter, &registry, vec![ImageInput::from_path("tag.jpg")]).await;
//! for summary in registry.summaries() {
//!     println!("{}", summary.text);
//! }
//! ```
//!
//! # Modules
//!
//! - [`pricing`] - Fee and currency engine
//! - [`adapter`] - Total wrapper around an [`ImageAnalyzer`]
//! - [`pipeline`] - Concurrent batch processing
//! - [`registry`] - In-memory item store and edits
//! - [`testing`] - Mock implementations for testing

pub mod adapter;
pub mod ai;
pub mod config;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod pricing;
pub mod registry;
pub mod testing;
pub mod traits;
pub mod types;

pub use adapter::{AnalysisOutcome, ExtractionAdapter};
pub use config::Config;
pub use error::{AnalysisError, AnalysisResult, ConfigError};
pub use input::parse_numeric_input;
pub use pipeline::{decode, run_batch, BatchReport};
pub use pricing::{adjusted_price, convert, render_summary, PriceQuote, PriceRules};
pub use registry::{PricedSummary, Registry, RegistrySnapshot};
pub use traits::{DiagnosticSink, ImageAnalyzer, TracingSink};
pub use types::{
    BatchProgress, EncodedImage, ExtractionResult, ImageInput, ImageSource, Item, ItemField,
    ItemId, ItemPatch,
};

#[cfg(feature = "openai")]
pub use ai::OpenAIAnalyzer;
