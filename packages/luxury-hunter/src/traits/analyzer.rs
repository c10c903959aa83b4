//! Image analyzer trait.
//!
//! The analyzer is the single seam to the external vision provider. Any
//! implementation may fail, stall or panic; the extraction adapter turns all
//! of those into the failure sentinel, so implementations should simply
//! return their errors.

use async_trait::async_trait;

use crate::error::AnalysisResult;
use crate::types::{EncodedImage, ExtractionResult};

/// Reads product attributes off a single photograph.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Analyze one encoded image.
    ///
    /// Called concurrently for every image in a batch; implementations must
    /// not assume any ordering between calls.
    async fn analyze_image(&self, image: &EncodedImage) -> AnalysisResult<ExtractionResult>;
}
