//! Extraction adapter.
//!
//! Wraps an [`ImageAnalyzer`] so that analysis is total: every call yields an
//! [`ExtractionResult`]. Provider errors, timeouts and panics are reported to
//! the [`DiagnosticSink`] and replaced by [`ExtractionResult::sentinel`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::debug;

use crate::error::AnalysisError;
use crate::traits::{DiagnosticSink, ImageAnalyzer, TracingSink};
use crate::types::{EncodedImage, ExtractionResult};

/// What the adapter produced for one image.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// The provider returned a well-formed extraction
    Extracted(ExtractionResult),

    /// Analysis failed; `result` is the sentinel
    Fallback {
        result: ExtractionResult,
        reason: AnalysisError,
    },
}

impl AnalysisOutcome {
    pub fn result(&self) -> &ExtractionResult {
        match self {
            Self::Extracted(result) | Self::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> ExtractionResult {
        match self {
            Self::Extracted(result) | Self::Fallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Total wrapper around an analyzer.
#[derive(Clone)]
pub struct ExtractionAdapter {
    analyzer: Arc<dyn ImageAnalyzer>,
    diagnostics: Arc<dyn DiagnosticSink>,
    timeout: Option<Duration>,
}

impl ExtractionAdapter {
    /// Adapter logging failures through `tracing`, with no timeout.
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self {
            analyzer,
            diagnostics: Arc::new(TracingSink),
            timeout: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Bound every analysis call; elapsed calls become the sentinel.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Analyze one image. Never fails.
    pub async fn analyze(&self, image: &EncodedImage) -> ExtractionResult {
        self.analyze_detailed(image).await.into_result()
    }

    /// Analyze one image, keeping the failure reason if it fell back.
    pub async fn analyze_detailed(&self, image: &EncodedImage) -> AnalysisOutcome {
        let call = AssertUnwindSafe(self.analyzer.analyze_image(image)).catch_unwind();

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => return self.fallback(&image.label, AnalysisError::Timeout(limit)),
            },
            None => call.await,
        };

        match outcome {
            Ok(Ok(result)) => {
                debug!(
                    image = %image.label,
                    has_price = result.has_price,
                    brand = %result.brand,
                    "Image analyzed"
                );
                AnalysisOutcome::Extracted(result)
            }
            Ok(Err(error)) => self.fallback(&image.label, error),
            Err(payload) => self.fallback(
                &image.label,
                AnalysisError::Panicked(panic_message(payload.as_ref())),
            ),
        }
    }

    /// Report `error` and substitute the sentinel.
    pub fn fallback(&self, image_label: &str, error: AnalysisError) -> AnalysisOutcome {
        self.diagnostics.report(image_label, &error);
        AnalysisOutcome::Fallback {
            result: ExtractionResult::sentinel(),
            reason: error,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockAnalyzer, RecordingSink};

    fn image(label: &str) -> EncodedImage {
        EncodedImage {
            label: label.to_string(),
            data: "AAAA".to_string(),
            mime_type: "image/jpeg".to_string(),
        }
    }

    #[tokio::test]
    async fn passes_through_success() {
        let expected = ExtractionResult::priced("Chanel", "Bag", "AS1234", 500.0);
        let mock = MockAnalyzer::new().with_result("bag.jpg", expected.clone());
        let adapter = ExtractionAdapter::new(Arc::new(mock));

        let outcome = adapter.analyze_detailed(&image("bag.jpg")).await;
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.into_result(), expected);
    }

    #[tokio::test]
    async fn provider_error_becomes_sentinel() {
        let sink = Arc::new(RecordingSink::new());
        let mock = MockAnalyzer::new().with_failure("bad.jpg", "quota exceeded");
        let adapter = ExtractionAdapter::new(Arc::new(mock)).with_diagnostics(sink.clone());

        let result = adapter.analyze(&image("bad.jpg")).await;
        assert_eq!(result, ExtractionResult::sentinel());
        assert_eq!(sink.count(), 1);
        assert_eq!(sink.reports()[0].0, "bad.jpg");
    }

    #[tokio::test]
    async fn panic_becomes_sentinel() {
        let sink = Arc::new(RecordingSink::new());
        let mock = MockAnalyzer::new().with_panic("boom.jpg");
        let adapter = ExtractionAdapter::new(Arc::new(mock)).with_diagnostics(sink.clone());

        let outcome = adapter.analyze_detailed(&image("boom.jpg")).await;
        assert!(matches!(
            outcome,
            AnalysisOutcome::Fallback {
                reason: AnalysisError::Panicked(_),
                ..
            }
        ));
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test]
    async fn timeout_becomes_sentinel() {
        let mock = MockAnalyzer::new().with_delay("slow.jpg", Duration::from_secs(30));
        let adapter = ExtractionAdapter::new(Arc::new(mock))
            .with_diagnostics(Arc::new(RecordingSink::new()))
            .with_timeout(Duration::from_millis(20));

        let outcome = adapter.analyze_detailed(&image("slow.jpg")).await;
        assert!(matches!(
            outcome,
            AnalysisOutcome::Fallback {
                reason: AnalysisError::Timeout(_),
                ..
            }
        ));
        assert_eq!(outcome.result(), &ExtractionResult::sentinel());
    }

    #[test]
    fn panic_message_reads_payloads() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(boxed.as_ref()), "static");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");

        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }
}
