//! Vision provider implementations.

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAIAnalyzer, PRODUCT_TAG_INSTRUCTION};
