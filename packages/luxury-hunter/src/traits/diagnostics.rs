use tracing::warn;

use crate::error::AnalysisError;

/// Receives analysis failures after they have been replaced by the sentinel.
///
/// Failures never reach the caller of a batch; this is the only place they
/// are observable.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, image_label: &str, error: &AnalysisError);
}

/// Logs each failure as a structured warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, image_label: &str, error: &AnalysisError) {
        warn!(image = %image_label, error = %error, "Image analysis failed, using fallback");
    }
}
