//! Testing utilities including mock implementations.
//!
//! Useful for exercising batches and registries without calling a real
//! vision provider.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AnalysisError, AnalysisResult};
use crate::traits::{DiagnosticSink, ImageAnalyzer};
use crate::types::{EncodedImage, ExtractionResult};

/// Scripted behaviour for one image label.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this extraction
    Result(ExtractionResult),

    /// Fail with a provider error carrying this message
    Fail(String),

    /// Panic inside the analyzer
    Panic,

    /// Sleep, then return the extraction
    Delay(Duration, ExtractionResult),
}

/// Provider error raised by [`MockResponse::Fail`].
#[derive(Debug, Clone)]
pub struct MockProviderError(pub String);

impl fmt::Display for MockProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mock provider error: {}", self.0)
    }
}

impl std::error::Error for MockProviderError {}

/// A mock analyzer keyed by image label.
///
/// Labels without a scripted response get the default, which is the
/// unpriced "Unknown" extraction unless overridden.
#[derive(Clone)]
pub struct MockAnalyzer {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    default: MockResponse,
    calls: Arc<RwLock<Vec<String>>>,
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            default: MockResponse::Result(ExtractionResult::sentinel()),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Response for labels without a scripted one.
    pub fn with_default(mut self, response: MockResponse) -> Self {
        self.default = response;
        self
    }

    pub fn with_response(self, label: impl Into<String>, response: MockResponse) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(label.into(), response);
        self
    }

    pub fn with_result(self, label: impl Into<String>, result: ExtractionResult) -> Self {
        self.with_response(label, MockResponse::Result(result))
    }

    pub fn with_failure(self, label: impl Into<String>, message: impl Into<String>) -> Self {
        self.with_response(label, MockResponse::Fail(message.into()))
    }

    pub fn with_panic(self, label: impl Into<String>) -> Self {
        self.with_response(label, MockResponse::Panic)
    }

    /// Sleep for `delay` before returning the sentinel extraction.
    pub fn with_delay(self, label: impl Into<String>, delay: Duration) -> Self {
        self.with_response(
            label,
            MockResponse::Delay(delay, ExtractionResult::sentinel()),
        )
    }

    /// Labels analyzed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn response_for(&self, label: &str) -> MockResponse {
        self.responses
            .read()
            .unwrap()
            .get(label)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl ImageAnalyzer for MockAnalyzer {
    async fn analyze_image(&self, image: &EncodedImage) -> AnalysisResult<ExtractionResult> {
        self.calls.write().unwrap().push(image.label.clone());

        match self.response_for(&image.label) {
            MockResponse::Result(result) => Ok(result),
            MockResponse::Fail(message) => {
                Err(AnalysisError::provider(MockProviderError(message)))
            }
            MockResponse::Panic => panic!("mock analyzer panic for {}", image.label),
            MockResponse::Delay(delay, result) => {
                tokio::time::sleep(delay).await;
                Ok(result)
            }
        }
    }
}

/// Diagnostic sink that keeps every report for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: RwLock<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(image_label, error message)` pairs in report order.
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.read().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.reports.read().unwrap().len()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, image_label: &str, error: &AnalysisError) {
        self.reports
            .write()
            .unwrap()
            .push((image_label.to_string(), error.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(label: &str) -> EncodedImage {
        EncodedImage {
            label: label.to_string(),
            data: String::new(),
            mime_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_scripted_and_default() {
        let mock = MockAnalyzer::new()
            .with_result("a.jpg", ExtractionResult::priced("Dior", "Saddle", "M0446", 3500.0))
            .with_failure("b.jpg", "bad request");

        let a = mock.analyze_image(&image("a.jpg")).await.unwrap();
        assert_eq!(a.brand, "Dior");

        let b = mock.analyze_image(&image("b.jpg")).await.unwrap_err();
        assert!(b.to_string().contains("bad request"));

        let c = mock.analyze_image(&image("c.jpg")).await.unwrap();
        assert_eq!(c, ExtractionResult::sentinel());

        assert_eq!(mock.calls(), vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        sink.report("x.jpg", &AnalysisError::MissingOutput);
        assert_eq!(sink.count(), 1);
        assert_eq!(
            sink.reports()[0],
            (
                "x.jpg".to_string(),
                "analysis provider returned no output".to_string()
            )
        );
    }
}
